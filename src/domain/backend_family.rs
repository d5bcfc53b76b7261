use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of speech-recognition model behind a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendFamily {
    /// Acoustic CTC models.
    Wav2Vec2,
    /// Sequence-to-sequence models.
    Whisper,
}

impl BackendFamily {
    pub const ALL: [BackendFamily; 2] = [BackendFamily::Whisper, BackendFamily::Wav2Vec2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav2Vec2 => "wav2vec2",
            Self::Whisper => "whisper",
        }
    }
}

impl TryFrom<&str> for BackendFamily {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "wav2vec2" => Ok(Self::Wav2Vec2),
            "whisper" => Ok(Self::Whisper),
            other => Err(format!(
                "Invalid backend family: {}. Expected: wav2vec2 or whisper",
                other
            )),
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
