use std::error::Error;
use std::fmt;

use async_trait::async_trait;

use crate::domain::{AudioBuffer, AudioFormat, DecodedAudio};

use super::TranscodeError;

#[async_trait]
pub trait AudioDecoder: Send + Sync {
    async fn decode(&self, buffer: &AudioBuffer) -> Result<DecodedAudio, DecodeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeTier {
    Native,
    Transcode,
    RawPcm,
}

impl fmt::Display for DecodeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::Transcode => "transcode",
            Self::RawPcm => "raw pcm",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("buffer too short to identify ({0} bytes)")]
    TooShort(usize),
    #[error("no known magic bytes")]
    Unrecognized,
}

#[derive(Debug, thiserror::Error)]
pub enum NativeDecodeError {
    #[error("probe: {0}")]
    Probe(String),
    #[error("no audio track found")]
    NoTrack,
    #[error("unknown sample rate")]
    UnknownSampleRate,
    #[error("codec: {0}")]
    Codec(String),
    #[error("packet: {0}")]
    Packet(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("no audio samples decoded")]
    NoSamples,
    #[error("decode task aborted: {0}")]
    TaskAborted(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeTierError {
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error("transcoded output unreadable: {0}")]
    Output(#[from] NativeDecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RawPcmError {
    #[error("{0} bytes hold no complete 16-bit sample")]
    NoCompleteSample(usize),
    #[error("payload is a {0} container, not raw PCM")]
    CompressedContainer(AudioFormat),
}

/// Every decode tier failed; one cause per tier, in cascade order.
#[derive(Debug, thiserror::Error)]
#[error(
    "all decode tiers failed (native: {native}; transcode: {transcode}; raw pcm: {raw_pcm})"
)]
pub struct DecodeError {
    pub native: NativeDecodeError,
    pub transcode: TranscodeTierError,
    pub raw_pcm: RawPcmError,
}

impl DecodeError {
    pub fn causes(&self) -> [(DecodeTier, &(dyn Error + 'static)); 3] {
        [
            (DecodeTier::Native, &self.native),
            (DecodeTier::Transcode, &self.transcode),
            (DecodeTier::RawPcm, &self.raw_pcm),
        ]
    }
}
