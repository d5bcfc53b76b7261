/// One step of a reference-to-hypothesis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Hit,
    Substitution,
    Deletion,
    Insertion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub distance: usize,
    pub hits: usize,
    pub substitutions: usize,
    pub deletions: usize,
    pub insertions: usize,
    pub operations: Vec<EditOp>,
}

/// Levenshtein distance with unit costs, in O(min) memory.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, x) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, y) in short.iter().enumerate() {
            let cost = usize::from(x != y);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Minimum-cost alignment with the operations that realize it.
///
/// When several moves reach a cell at the same cost the backtrace prefers, in
/// order: hit, substitution, deletion, insertion.
pub fn align<T: PartialEq>(reference: &[T], hypothesis: &[T]) -> Alignment {
    let rows = reference.len() + 1;
    let cols = hypothesis.len() + 1;
    let mut table = vec![0usize; rows * cols];
    let at = |i: usize, j: usize| i * cols + j;

    for i in 0..rows {
        table[at(i, 0)] = i;
    }
    for j in 0..cols {
        table[at(0, j)] = j;
    }
    for i in 1..rows {
        for j in 1..cols {
            let cost = usize::from(reference[i - 1] != hypothesis[j - 1]);
            table[at(i, j)] = (table[at(i - 1, j - 1)] + cost)
                .min(table[at(i - 1, j)] + 1)
                .min(table[at(i, j - 1)] + 1);
        }
    }

    let mut alignment = Alignment {
        distance: table[at(rows - 1, cols - 1)],
        ..Alignment::default()
    };

    let (mut i, mut j) = (rows - 1, cols - 1);
    while i > 0 || j > 0 {
        let here = table[at(i, j)];
        let op = if i > 0
            && j > 0
            && reference[i - 1] == hypothesis[j - 1]
            && here == table[at(i - 1, j - 1)]
        {
            EditOp::Hit
        } else if i > 0 && j > 0 && here == table[at(i - 1, j - 1)] + 1 {
            EditOp::Substitution
        } else if i > 0 && here == table[at(i - 1, j)] + 1 {
            EditOp::Deletion
        } else {
            EditOp::Insertion
        };

        match op {
            EditOp::Hit => {
                alignment.hits += 1;
                i -= 1;
                j -= 1;
            }
            EditOp::Substitution => {
                alignment.substitutions += 1;
                i -= 1;
                j -= 1;
            }
            EditOp::Deletion => {
                alignment.deletions += 1;
                i -= 1;
            }
            EditOp::Insertion => {
                alignment.insertions += 1;
                j -= 1;
            }
        }
        alignment.operations.push(op);
    }

    alignment.operations.reverse();
    alignment
}
