use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::application::ports::{
    AudioDecoder, AudioTranscoder, DecodeError, NativeDecodeError, TranscodeTierError,
};
use crate::domain::{AudioBuffer, AudioFormat, DecodedAudio};

use super::format_sniffer::sniff;
use super::native_decoder::decode_native;
use super::raw_pcm::{RAW_PCM_SAMPLE_RATE, decode_raw_pcm};

/// Native decode, then transcode-and-decode, then raw PCM.
///
/// Each tier runs only after the previous one failed; if all fail the three
/// causes are returned together.
pub struct CascadingAudioDecoder {
    transcoder: Arc<dyn AudioTranscoder>,
}

impl CascadingAudioDecoder {
    pub fn new(transcoder: Arc<dyn AudioTranscoder>) -> Self {
        Self { transcoder }
    }

    async fn transcode_tier(
        &self,
        buffer: &AudioBuffer,
        format: AudioFormat,
    ) -> Result<DecodedAudio, TranscodeTierError> {
        let wav = self.transcoder.transcode(buffer.as_slice(), format).await?;
        let audio = decode_native_blocking(Bytes::from(wav), AudioFormat::Wav).await?;
        Ok(audio)
    }
}

#[async_trait]
impl AudioDecoder for CascadingAudioDecoder {
    async fn decode(&self, buffer: &AudioBuffer) -> Result<DecodedAudio, DecodeError> {
        if buffer.is_empty() {
            tracing::debug!("Empty audio buffer, nothing to decode");
            return Ok(DecodedAudio::with_rate(Vec::new(), RAW_PCM_SAMPLE_RATE));
        }

        let format = buffer.format_with(|data| {
            sniff(data).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Audio format not recognized from magic bytes");
                AudioFormat::Unknown
            })
        });

        let native = match decode_native_blocking(buffer.bytes().clone(), format).await {
            Ok(audio) => {
                log_decoded("native", &audio);
                return Ok(audio);
            }
            Err(e) => {
                tracing::warn!(error = %e, format = %format, "Native decode failed, trying transcoder");
                e
            }
        };

        let transcode = match self.transcode_tier(buffer, format).await {
            Ok(audio) => {
                log_decoded("transcode", &audio);
                return Ok(audio);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transcoding failed, trying raw PCM");
                e
            }
        };

        match decode_raw_pcm(buffer.as_slice()) {
            Ok(audio) => {
                log_decoded("raw_pcm", &audio);
                Ok(audio)
            }
            Err(raw_pcm) => Err(DecodeError {
                native,
                transcode,
                raw_pcm,
            }),
        }
    }
}

async fn decode_native_blocking(
    data: Bytes,
    format: AudioFormat,
) -> Result<DecodedAudio, NativeDecodeError> {
    tokio::task::spawn_blocking(move || decode_native(data, format))
        .await
        .map_err(|e| NativeDecodeError::TaskAborted(e.to_string()))?
}

fn log_decoded(tier: &str, audio: &DecodedAudio) {
    tracing::debug!(
        tier,
        samples = audio.len(),
        sample_rate = audio.sample_rate(),
        duration_secs = audio.duration().as_secs_f32(),
        "Audio decoded"
    );
}
