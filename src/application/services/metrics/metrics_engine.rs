use crate::domain::EvaluationMetrics;

use super::alignment::{align, edit_distance};
use super::sequence_matcher::similarity_ratio;
use super::text_normalizer::{normalize_text, words};

pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsInputError {
    #[error("{field} text has {len} characters, limit is {max}")]
    InputTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Scores a hypothesis transcript against a reference.
///
/// Both texts are normalized first, so case, punctuation and spacing never
/// count as errors. Alignment is quadratic in input length, hence the cap.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine {
    max_input_chars: usize,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_CHARS)
    }
}

impl MetricsEngine {
    pub fn new(max_input_chars: usize) -> Self {
        Self { max_input_chars }
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    pub fn compute(
        &self,
        reference: &str,
        hypothesis: &str,
    ) -> Result<EvaluationMetrics, MetricsInputError> {
        let char_count_reference = self.check_length("reference", reference)?;
        let char_count_hypothesis = self.check_length("hypothesis", hypothesis)?;

        let reference = normalize_text(reference);
        let hypothesis = normalize_text(hypothesis);

        let reference_words = words(&reference);
        let hypothesis_words = words(&hypothesis);
        let word_alignment = align(&reference_words, &hypothesis_words);
        let wer = error_rate(
            word_alignment.distance,
            reference_words.len(),
            hypothesis_words.len(),
        );

        let reference_chars: Vec<char> = reference.chars().collect();
        let hypothesis_chars: Vec<char> = hypothesis.chars().collect();
        let cer = error_rate(
            edit_distance(&reference_chars, &hypothesis_chars),
            reference_chars.len(),
            hypothesis_chars.len(),
        );

        let metrics = EvaluationMetrics {
            wer,
            cer,
            word_substitutions: word_alignment.substitutions,
            word_deletions: word_alignment.deletions,
            word_insertions: word_alignment.insertions,
            word_hits: word_alignment.hits,
            similarity_ratio: similarity_ratio(&reference_chars, &hypothesis_chars),
            accuracy: (1.0 - wer).max(0.0),
            word_count_reference: reference_words.len(),
            word_count_hypothesis: hypothesis_words.len(),
            char_count_reference,
            char_count_hypothesis,
        };

        tracing::debug!(
            wer = metrics.wer,
            cer = metrics.cer,
            hits = metrics.word_hits,
            substitutions = metrics.word_substitutions,
            deletions = metrics.word_deletions,
            insertions = metrics.word_insertions,
            "Metrics computed"
        );

        Ok(metrics)
    }

    /// Returns the character count of `text` when it is within the limit.
    fn check_length(&self, field: &'static str, text: &str) -> Result<usize, MetricsInputError> {
        let len = text.chars().count();
        if len > self.max_input_chars {
            return Err(MetricsInputError::InputTooLong {
                field,
                len,
                max: self.max_input_chars,
            });
        }
        Ok(len)
    }
}

/// Whether there is anything to compare: at least one side has non-blank text.
pub fn validate_text_input(reference: &str, hypothesis: &str) -> bool {
    !reference.trim().is_empty() || !hypothesis.trim().is_empty()
}

fn error_rate(distance: usize, reference_len: usize, hypothesis_len: usize) -> f64 {
    match (reference_len, hypothesis_len) {
        (0, 0) => 0.0,
        (0, _) => f64::INFINITY,
        (n, _) => distance as f64 / n as f64,
    }
}
