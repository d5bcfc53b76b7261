use std::fmt;

use serde::Serialize;

/// MIME types accepted at the ingestion boundary.
pub const SUPPORTED_AUDIO_MIME_TYPES: &[&str] = &[
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/mp3",
    "audio/mpeg",
    "audio/mp4",
    "audio/m4a",
    "audio/webm",
    "audio/ogg",
    "audio/flac",
    "audio/aac",
    "audio/3gpp",
    "audio/amr",
];

/// Container format detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Webm,
    Mp4,
    Flac,
    Unknown,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Flac => "flac",
            Self::Unknown => "unknown",
        }
    }

    /// File extension used for hints and temporary files.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            Self::Unknown => None,
            other => Some(other.as_str()),
        }
    }

    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "audio/wav" | "audio/wave" | "audio/x-wav" => Self::Wav,
            "audio/mp3" | "audio/mpeg" => Self::Mp3,
            "audio/ogg" | "audio/opus" => Self::Ogg,
            "audio/webm" => Self::Webm,
            "audio/mp4" | "audio/m4a" | "audio/aac" => Self::Mp4,
            "audio/flac" => Self::Flac,
            _ => Self::Unknown,
        }
    }

    /// Compressed containers whose payload can never be raw PCM.
    pub fn is_compressed_container(&self) -> bool {
        matches!(
            self,
            Self::Mp3 | Self::Ogg | Self::Webm | Self::Mp4 | Self::Flac
        )
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
