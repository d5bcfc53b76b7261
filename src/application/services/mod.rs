mod audio_normalizer;
mod evaluation_service;
pub mod metrics;
mod model_manager;
mod transcript_postprocessor;
mod transcription_pipeline;

pub use audio_normalizer::{
    AudioNormalizer, ResampleError, TARGET_SAMPLE_RATE, normalize_peak, resample,
};
pub use evaluation_service::{
    EvaluationReport, EvaluationService, FamilySummary, FileEvaluation, RunFailure,
};
pub use metrics::{MetricsEngine, MetricsInputError};
pub use model_manager::{
    ModelManager, ModelManagerBuilder, ModelNotFoundError, ModelRegistryError,
};
pub use transcript_postprocessor::{NO_SPEECH_TEXT, TranscriptPostprocessor, clean_transcript};
pub use transcription_pipeline::{TranscriptionError, TranscriptionPipeline, TranscriptionStage};
