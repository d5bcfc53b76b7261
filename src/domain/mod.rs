mod audio_buffer;
mod audio_format;
mod backend_family;
mod decoded_audio;
mod evaluation_metrics;
mod model_comparison;
mod model_descriptor;
mod transcription_result;

pub use audio_buffer::AudioBuffer;
pub use audio_format::{AudioFormat, SUPPORTED_AUDIO_MIME_TYPES};
pub use backend_family::BackendFamily;
pub use decoded_audio::{DecodedAudio, InvalidSampleRate};
pub use evaluation_metrics::EvaluationMetrics;
pub use model_comparison::{ModelComparison, ModelRun, compare};
pub use model_descriptor::{ModelDescriptor, QualityTier};
pub use transcription_result::TranscriptionResult;
