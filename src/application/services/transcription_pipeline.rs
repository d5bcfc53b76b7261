use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::{
    AsrBackend, AudioDecoder, BackendLoadError, DecodeError, InferenceError,
};
use crate::domain::{AudioBuffer, TranscriptionResult};
use crate::infrastructure::observability::preview_text;

use super::audio_normalizer::{AudioNormalizer, ResampleError};
use super::metrics::{MetricsEngine, MetricsInputError};
use super::model_manager::{ModelManager, ModelNotFoundError};
use super::transcript_postprocessor::TranscriptPostprocessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionStage {
    ModelSelection,
    ModelLoad,
    Decode,
    Resample,
    Inference,
    /// Never fails: output with no speech left becomes the no-speech text,
    /// so no [`TranscriptionError`] carries this stage.
    Postprocess,
    Metrics,
}

impl TranscriptionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModelSelection => "model_selection",
            Self::ModelLoad => "model_load",
            Self::Decode => "decode",
            Self::Resample => "resample",
            Self::Inference => "inference",
            Self::Postprocess => "postprocess",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for TranscriptionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("model_selection: {0}")]
    ModelSelection(#[from] ModelNotFoundError),
    #[error("model_load: {0}")]
    ModelLoad(#[from] BackendLoadError),
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("resample: {0}")]
    Resample(#[from] ResampleError),
    #[error("inference: {0}")]
    Inference(#[from] InferenceError),
    #[error("metrics: {0}")]
    Metrics(#[from] MetricsInputError),
    #[error("cancelled before {0}")]
    Cancelled(TranscriptionStage),
    #[error("{stage}: task aborted: {message}")]
    TaskAborted {
        stage: TranscriptionStage,
        message: String,
    },
}

impl TranscriptionError {
    /// The stage that failed, or that was about to start when cancelled.
    pub fn stage(&self) -> TranscriptionStage {
        match self {
            Self::ModelSelection(_) => TranscriptionStage::ModelSelection,
            Self::ModelLoad(_) => TranscriptionStage::ModelLoad,
            Self::Decode(_) => TranscriptionStage::Decode,
            Self::Resample(_) => TranscriptionStage::Resample,
            Self::Inference(_) => TranscriptionStage::Inference,
            Self::Metrics(_) => TranscriptionStage::Metrics,
            Self::Cancelled(stage) | Self::TaskAborted { stage, .. } => *stage,
        }
    }
}

/// Decode, normalize, transcribe and optionally score one audio buffer.
///
/// The active model is read once at the start of a call and reported in the
/// result, so a concurrent `set_active` only affects later calls.
pub struct TranscriptionPipeline {
    decoder: Arc<dyn AudioDecoder>,
    model_manager: Arc<ModelManager>,
    normalizer: AudioNormalizer,
    postprocessor: TranscriptPostprocessor,
    metrics: MetricsEngine,
}

impl TranscriptionPipeline {
    pub fn new(decoder: Arc<dyn AudioDecoder>, model_manager: Arc<ModelManager>) -> Self {
        Self {
            decoder,
            model_manager,
            normalizer: AudioNormalizer::default(),
            postprocessor: TranscriptPostprocessor::default(),
            metrics: MetricsEngine::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: AudioNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_postprocessor(mut self, postprocessor: TranscriptPostprocessor) -> Self {
        self.postprocessor = postprocessor;
        self
    }

    pub fn with_metrics_engine(mut self, metrics: MetricsEngine) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn model_manager(&self) -> &Arc<ModelManager> {
        &self.model_manager
    }

    pub async fn transcribe(
        &self,
        audio: impl Into<AudioBuffer>,
        backend: &dyn AsrBackend,
        reference: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        self.transcribe_with_cancellation(audio, backend, reference, &CancellationToken::new())
            .await
    }

    /// Like [`transcribe`](Self::transcribe), but gives up when `cancel` fires
    /// before inference starts. Once inference is running the call completes.
    pub async fn transcribe_with_cancellation(
        &self,
        audio: impl Into<AudioBuffer>,
        backend: &dyn AsrBackend,
        reference: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let audio = audio.into();
        let span = tracing::info_span!(
            "transcription",
            request_id = %Uuid::new_v4(),
            family = %backend.family(),
            bytes = audio.len(),
        );

        self.run(audio, backend, reference, cancel)
            .instrument(span)
            .await
            .inspect_err(|e| {
                tracing::warn!(stage = %e.stage(), error = %e, "Transcription failed");
            })
    }

    async fn run(
        &self,
        audio: AudioBuffer,
        backend: &dyn AsrBackend,
        reference: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let descriptor = self
            .model_manager
            .get_descriptor(backend.family(), None)?;
        tracing::debug!(model = %descriptor.key, "Model selected");

        ensure_active(cancel, TranscriptionStage::ModelLoad)?;
        backend.load(&descriptor, false).await?;

        let started = Instant::now();

        ensure_active(cancel, TranscriptionStage::Decode)?;
        let decoded = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(TranscriptionError::Cancelled(TranscriptionStage::Decode));
            }
            decoded = self.decoder.decode(&audio) => decoded?,
        };
        tracing::debug!(
            samples = decoded.len(),
            sample_rate = decoded.sample_rate(),
            "Audio decoded"
        );

        ensure_active(cancel, TranscriptionStage::Resample)?;
        let normalizer = self.normalizer;
        let prepared = tokio::task::spawn_blocking(move || normalizer.prepare(decoded))
            .await
            .map_err(|e| TranscriptionError::TaskAborted {
                stage: TranscriptionStage::Resample,
                message: e.to_string(),
            })??;

        ensure_active(cancel, TranscriptionStage::Inference)?;
        let raw = backend
            .transcribe(descriptor.as_ref(), prepared.samples())
            .await?;
        let inference_time = started.elapsed();

        let text = self.postprocessor.process(&raw);
        tracing::info!(
            model = %descriptor.key,
            inference_ms = inference_time.as_millis() as u64,
            text = %preview_text(&text),
            "Transcription completed"
        );

        let mut result = TranscriptionResult::new(text, inference_time, (*descriptor).clone());

        if let Some(reference) = reference.filter(|r| !r.trim().is_empty()) {
            let metrics = self.metrics.compute(reference, &result.text)?;
            result = result.with_metrics(metrics);
        }

        Ok(result)
    }
}

fn ensure_active(
    cancel: &CancellationToken,
    next: TranscriptionStage,
) -> Result<(), TranscriptionError> {
    if cancel.is_cancelled() {
        tracing::info!(stage = %next, "Transcription cancelled");
        return Err(TranscriptionError::Cancelled(next));
    }
    Ok(())
}
