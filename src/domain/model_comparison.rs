use std::time::Duration;

use serde::Serialize;

use super::transcription_result::serialize_seconds;
use super::{BackendFamily, EvaluationMetrics, TranscriptionResult};

/// One backend's transcription of one file, scored against the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRun {
    pub family: BackendFamily,
    pub model_key: String,
    pub text: String,
    pub metrics: EvaluationMetrics,
    #[serde(serialize_with = "serialize_seconds")]
    pub inference_time: Duration,
}

impl ModelRun {
    /// Builds a run from a pipeline result; `None` if no metrics were computed.
    pub fn from_result(result: TranscriptionResult) -> Option<Self> {
        let metrics = result.metrics?;
        Some(Self {
            family: result.model_info.family,
            model_key: result.model_info.key,
            text: result.text,
            metrics,
            inference_time: result.inference_time,
        })
    }

    /// Accuracy per second of inference: `(1 - WER) / seconds`.
    pub fn score(&self) -> f64 {
        let secs = self.inference_time.as_secs_f64();
        if secs > 0.0 {
            (1.0 - self.metrics.wer) / secs
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelComparison {
    pub winner: BackendFamily,
    pub winner_model: String,
    pub winner_score: f64,
    pub improvement: f64,
}

/// Picks the best-scoring run. Ties go to the later run.
pub fn compare(runs: &[ModelRun]) -> Option<ModelComparison> {
    let winner = runs
        .iter()
        .max_by(|a, b| a.score().total_cmp(&b.score()))?;

    let max_wer = runs
        .iter()
        .map(|r| r.metrics.wer)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_wer = runs
        .iter()
        .map(|r| r.metrics.wer)
        .fold(f64::INFINITY, f64::min);

    let improvement = if max_wer > 0.0 && max_wer.is_finite() {
        (max_wer - min_wer) / max_wer
    } else {
        0.0
    };

    Some(ModelComparison {
        winner: winner.family,
        winner_model: winner.model_key.clone(),
        winner_score: winner.score(),
        improvement,
    })
}
