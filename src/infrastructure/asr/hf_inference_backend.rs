use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::application::ports::{AsrBackend, BackendLoadError, BackendState, InferenceError};
use crate::application::services::TARGET_SAMPLE_RATE;
use crate::domain::{BackendFamily, ModelDescriptor};
use crate::infrastructure::audio::encode_wav_pcm16;

use super::model_slot::{ModelSlot, ensure_family};

const WAIT_FOR_MODEL_HEADER: &str = "x-wait-for-model";
const WARMUP_SAMPLES: usize = TARGET_SAMPLE_RATE as usize / 2;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

struct RemoteModel {
    url: String,
}

/// CTC backend served by a Hugging Face style inference endpoint.
///
/// Loading resolves the endpoint URL and warms the model up, so the first
/// real request does not pay the cold-start cost.
pub struct HfInferenceBackend {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    slot: ModelSlot<RemoteModel>,
}

impl HfInferenceBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            slot: ModelSlot::new(),
        })
    }

    async fn warm_up(
        &self,
        descriptor: ModelDescriptor,
    ) -> Result<RemoteModel, BackendLoadError> {
        let url = format!("{}/models/{}", self.base_url, descriptor.backend_identifier);
        tracing::debug!(url = %url, "Warming up remote model");

        let silence = vec![0.0; WARMUP_SAMPLES];
        self.post_audio(&url, &silence, true)
            .await
            .map_err(|e| BackendLoadError::Initialization {
                model: descriptor.backend_identifier.clone(),
                reason: e.to_string(),
            })?;

        Ok(RemoteModel { url })
    }

    async fn post_audio(
        &self,
        url: &str,
        samples: &[f32],
        wait_for_model: bool,
    ) -> Result<String, InferenceError> {
        let body = encode_wav_pcm16(samples, TARGET_SAMPLE_RATE);

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "audio/wav")
            .body(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        if wait_for_model {
            request = request.header(WAIT_FOR_MODEL_HEADER, "true");
        }

        let response = request
            .send()
            .await
            .map_err(|e| InferenceError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(InferenceError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        Ok(parsed.text)
    }
}

#[async_trait]
impl AsrBackend for HfInferenceBackend {
    fn family(&self) -> BackendFamily {
        BackendFamily::Wav2Vec2
    }

    async fn load(
        &self,
        descriptor: &ModelDescriptor,
        force: bool,
    ) -> Result<(), BackendLoadError> {
        ensure_family(descriptor, BackendFamily::Wav2Vec2)?;
        self.slot
            .load_with(descriptor, force, |descriptor| self.warm_up(descriptor))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Remote model load failed"))?;

        Ok(())
    }

    async fn transcribe(
        &self,
        descriptor: &ModelDescriptor,
        samples: &[f32],
    ) -> Result<String, InferenceError> {
        ensure_family(descriptor, BackendFamily::Wav2Vec2)?;
        let loaded = self
            .slot
            .acquire(descriptor, |descriptor| self.warm_up(descriptor))
            .await?;

        tracing::debug!(
            model = %loaded.descriptor.backend_identifier,
            samples = samples.len(),
            "Sending audio to inference endpoint"
        );

        let text = self.post_audio(&loaded.model.url, samples, false).await?;

        tracing::debug!(chars = text.len(), "Remote transcription completed");
        Ok(text)
    }

    fn current_descriptor(&self) -> Option<ModelDescriptor> {
        self.slot.descriptor()
    }

    fn state(&self) -> BackendState {
        self.slot.state()
    }
}
