use std::collections::HashMap;
use std::hash::Hash;

const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of `size` equal elements at `a[a_start..]` and `b[b_start..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// `2 * matched / (len(a) + len(b))`, from recursively taking the longest
/// common block and matching either side of it. `1.0` for two empty inputs.
pub fn similarity_ratio<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(a, b).iter().map(|m| m.size).sum();
    2.0 * matched as f64 / total as f64
}

/// Non-overlapping matching blocks in ascending order.
///
/// For `b` of 200 or more elements, elements occurring more than
/// `len / 100 + 1` times never seed a match, though matches may still extend
/// over them.
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchingBlock> {
    let index = index_b(b);
    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(a, b, &index, alo, ahi, blo, bhi);
        if block.size == 0 {
            continue;
        }
        let (i, j, k) = (block.a_start, block.b_start, block.size);
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
        blocks.push(block);
    }

    blocks.sort();
    blocks
}

fn index_b<T: Eq + Hash>(b: &[T]) -> HashMap<&T, Vec<usize>> {
    let mut index: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        index.entry(item).or_default().push(j);
    }

    if b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        index.retain(|_, positions| positions.len() <= limit);
    }

    index
}

fn longest_match<T: Eq + Hash>(
    a: &[T],
    b: &[T],
    index: &HashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next_runs = HashMap::new();
        if let Some(positions) = index.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_ending_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_runs.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_ending_at = next_runs;
    }

    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < ahi
        && best_j + best_size < bhi
        && a[best_i + best_size] == b[best_j + best_size]
    {
        best_size += 1;
    }

    MatchingBlock {
        a_start: best_i,
        b_start: best_j,
        size: best_size,
    }
}
