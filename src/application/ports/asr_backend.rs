use std::fmt;

use async_trait::async_trait;

use crate::domain::{BackendFamily, ModelDescriptor};

/// Lifecycle of the model held by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendState {
    Unloaded,
    Loading(ModelDescriptor),
    Ready(ModelDescriptor),
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => f.write_str("unloaded"),
            Self::Loading(d) => write!(f, "loading {}", d.key),
            Self::Ready(d) => write!(f, "ready {}", d.key),
        }
    }
}

/// Speech-recognition capability. Callers never branch on the concrete backend.
#[async_trait]
pub trait AsrBackend: Send + Sync {
    fn family(&self) -> BackendFamily;

    /// Loads `descriptor`. A no-op when it is already loaded unless `force` is set.
    /// On failure the previously loaded model, if any, stays in service.
    async fn load(&self, descriptor: &ModelDescriptor, force: bool)
    -> Result<(), BackendLoadError>;

    /// Transcribes 16 kHz mono samples with the model built from `descriptor`.
    ///
    /// When a concurrent load has replaced that model, it is loaded again
    /// first, so the text never comes from a model the caller did not ask for.
    async fn transcribe(
        &self,
        descriptor: &ModelDescriptor,
        samples: &[f32],
    ) -> Result<String, InferenceError>;

    fn current_descriptor(&self) -> Option<ModelDescriptor>;

    fn state(&self) -> BackendState;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendLoadError {
    #[error("model {model} does not belong to the {expected} backend")]
    WrongFamily {
        model: String,
        expected: BackendFamily,
    },
    #[error("failed to fetch model files for {model}: {reason}")]
    Fetch { model: String, reason: String },
    #[error("failed to initialize model {model}: {reason}")]
    Initialization { model: String, reason: String },
    #[error("model load for {model} was interrupted: {reason}")]
    Interrupted { model: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(#[from] BackendLoadError),
    #[error("inference failed: {0}")]
    Failed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
