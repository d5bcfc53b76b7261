use std::num::NonZeroU32;

use crate::application::ports::RawPcmError;
use crate::domain::DecodedAudio;

use super::format_sniffer::container_signature;

pub const RAW_PCM_SAMPLE_RATE: NonZeroU32 = match NonZeroU32::new(16_000) {
    Some(rate) => rate,
    None => unreachable!(),
};

/// Reads the buffer as headerless little-endian i16 mono at 16 kHz.
///
/// A trailing odd byte is dropped. Buffers opening with a compressed
/// container signature are refused.
pub fn decode_raw_pcm(data: &[u8]) -> Result<DecodedAudio, RawPcmError> {
    if let Some(format) = container_signature(data) {
        return Err(RawPcmError::CompressedContainer(format));
    }

    let usable = data.len() & !1;
    if usable == 0 {
        return Err(RawPcmError::NoCompleteSample(data.len()));
    }
    if usable != data.len() {
        tracing::debug!(bytes = data.len(), "Odd-length PCM buffer, dropping trailing byte");
    }

    let samples = data[..usable]
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();

    Ok(DecodedAudio::with_rate(samples, RAW_PCM_SAMPLE_RATE))
}
