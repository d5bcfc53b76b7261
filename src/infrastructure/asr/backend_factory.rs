use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::AsrBackend;
use crate::domain::BackendFamily;
use crate::presentation::config::{ScaffoldConfig, Settings};

use super::candle_whisper_backend::CandleWhisperBackend;
use super::hf_inference_backend::HfInferenceBackend;
use super::mock_backend::MockAsrBackend;

#[derive(Debug, thiserror::Error)]
pub enum BackendFactoryError {
    #[error("http client for {family} backend: {reason}")]
    HttpClient {
        family: BackendFamily,
        reason: String,
    },
}

pub struct BackendFactory;

impl BackendFactory {
    pub fn create(
        family: BackendFamily,
        settings: &Settings,
        scaffold: &ScaffoldConfig,
    ) -> Result<Arc<dyn AsrBackend>, BackendFactoryError> {
        if scaffold.enabled {
            tracing::info!(family = %family, "Scaffold mode: using mock backend");
            let backend = MockAsrBackend::new(family, scaffold.mock_transcript.clone())
                .with_response_delay(Duration::from_millis(scaffold.mock_response_delay_ms));
            return Ok(Arc::new(backend));
        }

        match family {
            BackendFamily::Whisper => {
                let backend = CandleWhisperBackend::new(settings.backends.whisper.device);
                Ok(Arc::new(backend))
            }
            BackendFamily::Wav2Vec2 => {
                let remote = &settings.backends.wav2vec2;
                let backend = HfInferenceBackend::new(
                    remote.base_url.clone(),
                    remote.api_token.clone(),
                    remote.request_timeout(),
                )
                .map_err(|e| BackendFactoryError::HttpClient {
                    family,
                    reason: e.to_string(),
                })?;
                Ok(Arc::new(backend))
            }
        }
    }
}
