use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{AsrBackend, BackendLoadError, BackendState, InferenceError};
use crate::domain::{BackendFamily, ModelDescriptor};

use super::model_slot::{ModelSlot, ensure_family};

/// Replaced in the scripted transcript by the key of the model that ran.
pub const MOCK_MODEL_PLACEHOLDER: &str = "{model}";

/// In-process backend returning a scripted transcript.
pub struct MockAsrBackend {
    family: BackendFamily,
    transcript: RwLock<String>,
    response_delay: Duration,
    load_delay: Duration,
    failing_models: HashSet<String>,
    loads: AtomicUsize,
    transcriptions: AtomicUsize,
    slot: ModelSlot<()>,
}

impl MockAsrBackend {
    pub fn new(family: BackendFamily, transcript: impl Into<String>) -> Self {
        Self {
            family,
            transcript: RwLock::new(transcript.into()),
            response_delay: Duration::ZERO,
            load_delay: Duration::ZERO,
            failing_models: HashSet::new(),
            loads: AtomicUsize::new(0),
            transcriptions: AtomicUsize::new(0),
            slot: ModelSlot::new(),
        }
    }

    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Loads of the model with this key fail.
    pub fn failing_on(mut self, model_key: impl Into<String>) -> Self {
        self.failing_models.insert(model_key.into());
        self
    }

    async fn build_model(&self, descriptor: ModelDescriptor) -> Result<(), BackendLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        if self.failing_models.contains(&descriptor.key) {
            return Err(BackendLoadError::Initialization {
                model: descriptor.key,
                reason: "mock load failure".to_string(),
            });
        }
        Ok(())
    }

    pub fn set_transcript(&self, transcript: impl Into<String>) {
        *self
            .transcript
            .write()
            .unwrap_or_else(PoisonError::into_inner) = transcript.into();
    }

    /// Number of loads that actually ran, successful or not.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn transcription_count(&self) -> usize {
        self.transcriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AsrBackend for MockAsrBackend {
    fn family(&self) -> BackendFamily {
        self.family
    }

    async fn load(
        &self,
        descriptor: &ModelDescriptor,
        force: bool,
    ) -> Result<(), BackendLoadError> {
        ensure_family(descriptor, self.family)?;
        self.slot
            .load_with(descriptor, force, |descriptor| self.build_model(descriptor))
            .await?;
        Ok(())
    }

    async fn transcribe(
        &self,
        descriptor: &ModelDescriptor,
        samples: &[f32],
    ) -> Result<String, InferenceError> {
        ensure_family(descriptor, self.family)?;
        let loaded = self
            .slot
            .acquire(descriptor, |descriptor| self.build_model(descriptor))
            .await?;
        self.transcriptions.fetch_add(1, Ordering::SeqCst);

        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }

        tracing::debug!(
            model = %loaded.descriptor.key,
            samples = samples.len(),
            "Mock transcription"
        );

        let transcript = self
            .transcript
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(MOCK_MODEL_PLACEHOLDER, &loaded.descriptor.key);
        Ok(transcript)
    }

    fn current_descriptor(&self) -> Option<ModelDescriptor> {
        self.slot.descriptor()
    }

    fn state(&self) -> BackendState {
        self.slot.state()
    }
}
