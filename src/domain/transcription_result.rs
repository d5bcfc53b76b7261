use std::time::Duration;

use serde::{Serialize, Serializer};

use super::{EvaluationMetrics, ModelDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    #[serde(serialize_with = "serialize_seconds")]
    pub inference_time: Duration,
    pub model_info: ModelDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<EvaluationMetrics>,
}

impl TranscriptionResult {
    pub fn new(text: String, inference_time: Duration, model_info: ModelDescriptor) -> Self {
        Self {
            text,
            inference_time,
            model_info,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: EvaluationMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

pub(crate) fn serialize_seconds<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
