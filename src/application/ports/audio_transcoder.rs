use std::time::Duration;

use async_trait::async_trait;

use crate::domain::AudioFormat;

/// External tool turning arbitrary audio into mono 16-bit 16 kHz WAV bytes.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode(&self, data: &[u8], hint: AudioFormat) -> Result<Vec<u8>, TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("transcoder binary not found: {0}")]
    BinaryNotFound(String),
    #[error("transcoder timed out after {0:?}")]
    Timeout(Duration),
    #[error("transcoder exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },
    #[error("transcoder produced no output")]
    EmptyOutput,
    #[error("temporary storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("transcoding unavailable: {0}")]
    Unavailable(String),
}
