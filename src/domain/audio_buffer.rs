use std::sync::OnceLock;

use bytes::Bytes;

use super::AudioFormat;

/// Raw audio bytes as received, with the sniffed format cached on first use.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    bytes: Bytes,
    format: OnceLock<AudioFormat>,
}

impl AudioBuffer {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            format: OnceLock::new(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the cached format, running `detect` only the first time.
    pub fn format_with(&self, detect: impl FnOnce(&[u8]) -> AudioFormat) -> AudioFormat {
        *self.format.get_or_init(|| detect(&self.bytes))
    }

    pub fn cached_format(&self) -> Option<AudioFormat> {
        self.format.get().copied()
    }
}

impl From<Vec<u8>> for AudioBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
