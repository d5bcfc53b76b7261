mod asr_backend;
mod audio_decoder;
mod audio_transcoder;

pub use asr_backend::{AsrBackend, BackendLoadError, BackendState, InferenceError};
pub use audio_decoder::{
    AudioDecoder, DecodeError, DecodeTier, FormatError, NativeDecodeError, RawPcmError,
    TranscodeTierError,
};
pub use audio_transcoder::{AudioTranscoder, TranscodeError};
