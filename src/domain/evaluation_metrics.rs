use serde::Serialize;

/// Alignment-based quality of a hypothesis against a reference transcript.
///
/// `wer` and `cer` are `f64::INFINITY` when the reference is empty but the
/// hypothesis is not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub wer: f64,
    pub cer: f64,
    pub word_substitutions: usize,
    pub word_deletions: usize,
    pub word_insertions: usize,
    pub word_hits: usize,
    pub similarity_ratio: f64,
    pub accuracy: f64,
    pub word_count_reference: usize,
    pub word_count_hypothesis: usize,
    pub char_count_reference: usize,
    pub char_count_hypothesis: usize,
}

impl EvaluationMetrics {
    pub fn word_errors(&self) -> usize {
        self.word_substitutions + self.word_deletions + self.word_insertions
    }

    pub fn is_perfect(&self) -> bool {
        self.word_errors() == 0 && self.wer == 0.0
    }
}
