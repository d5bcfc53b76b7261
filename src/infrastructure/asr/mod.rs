mod backend_factory;
mod candle_whisper_backend;
mod hf_inference_backend;
mod mock_backend;
mod model_slot;

pub use backend_factory::{BackendFactory, BackendFactoryError};
pub use candle_whisper_backend::{CandleWhisperBackend, WhisperDevice};
pub use hf_inference_backend::HfInferenceBackend;
pub use mock_backend::{MOCK_MODEL_PLACEHOLDER, MockAsrBackend};
pub use model_slot::{LoadedModel, ModelSlot};
