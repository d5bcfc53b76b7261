use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{AsrBackend, BackendLoadError, BackendState, InferenceError};
use crate::domain::{BackendFamily, ModelDescriptor};

use super::model_slot::{ModelSlot, ensure_family};

const MEL_FILTERS_REPO: &str = "FL33TW00D-HF/whisper-base";
const MAX_DECODE_TOKENS: usize = 224;

/// Device the Whisper weights run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhisperDevice {
    #[default]
    Cpu,
    Cuda,
    Metal,
}

impl WhisperDevice {
    fn open(self) -> candle_core::Result<Device> {
        match self {
            Self::Cpu => Ok(Device::Cpu),
            Self::Cuda => Device::new_cuda(0),
            Self::Metal => Device::new_metal(0),
        }
    }
}

struct WhisperModel {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

/// Sequence-to-sequence backend running Whisper locally through candle.
pub struct CandleWhisperBackend {
    device: WhisperDevice,
    slot: ModelSlot<WhisperModel>,
}

impl CandleWhisperBackend {
    pub fn new(device: WhisperDevice) -> Self {
        Self {
            device,
            slot: ModelSlot::new(),
        }
    }

    async fn build_model(
        &self,
        descriptor: ModelDescriptor,
    ) -> Result<WhisperModel, BackendLoadError> {
        let device = self.device;
        let model = descriptor.key.clone();
        tokio::task::spawn_blocking(move || WhisperModel::fetch(&descriptor, device))
            .await
            .map_err(|e| BackendLoadError::Interrupted {
                model,
                reason: e.to_string(),
            })?
    }
}

#[async_trait]
impl AsrBackend for CandleWhisperBackend {
    fn family(&self) -> BackendFamily {
        BackendFamily::Whisper
    }

    async fn load(
        &self,
        descriptor: &ModelDescriptor,
        force: bool,
    ) -> Result<(), BackendLoadError> {
        ensure_family(descriptor, BackendFamily::Whisper)?;
        self.slot
            .load_with(descriptor, force, |descriptor| self.build_model(descriptor))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Whisper model load failed"))?;

        Ok(())
    }

    async fn transcribe(
        &self,
        descriptor: &ModelDescriptor,
        samples: &[f32],
    ) -> Result<String, InferenceError> {
        ensure_family(descriptor, BackendFamily::Whisper)?;
        let loaded = self
            .slot
            .acquire(descriptor, |descriptor| self.build_model(descriptor))
            .await?;
        let language = loaded.descriptor.language_tag.clone();
        let samples = samples.to_vec();

        tokio::task::spawn_blocking(move || loaded.model.transcribe(&samples, &language))
            .await
            .map_err(|e| InferenceError::Failed(format!("inference task: {}", e)))?
    }

    fn current_descriptor(&self) -> Option<ModelDescriptor> {
        self.slot.descriptor()
    }

    fn state(&self) -> BackendState {
        self.slot.state()
    }
}

impl WhisperModel {
    fn fetch(
        descriptor: &ModelDescriptor,
        device: WhisperDevice,
    ) -> Result<Self, BackendLoadError> {
        let model_id = descriptor.backend_identifier.as_str();
        let fetch_err = |file: &str, e: &dyn std::fmt::Display| BackendLoadError::Fetch {
            model: model_id.to_string(),
            reason: format!("{}: {}", file, e),
        };
        let init_err = |what: &str, e: &dyn std::fmt::Display| BackendLoadError::Initialization {
            model: model_id.to_string(),
            reason: format!("{}: {}", what, e),
        };

        let device = device.open().map_err(|e| init_err("device", &e))?;

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing Candle Whisper backend"
        );

        let api = Api::new().map_err(|e| fetch_err("hub", &e))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| fetch_err("config.json", &e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| fetch_err("tokenizer.json", &e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| fetch_err("model.safetensors", &e))?;

        let config_contents =
            std::fs::read_to_string(&config_path).map_err(|e| init_err("read config", &e))?;
        let config: Config =
            serde_json::from_str(&config_contents).map_err(|e| init_err("parse config", &e))?;

        // large-v3 uses 128 mel bins, earlier checkpoints 80.
        let mel_file = match config.num_mel_bins {
            128 => "melfilters128.bytes",
            _ => "melfilters.bytes",
        };
        let mel_repo = api.repo(Repo::new(MEL_FILTERS_REPO.to_string(), RepoType::Model));
        let mel_bytes_path = mel_repo
            .get(mel_file)
            .map_err(|e| fetch_err(mel_file, &e))?;

        let tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| init_err("tokenizer", &e))?;

        let mel_bytes = std::fs::read(&mel_bytes_path).map_err(|e| init_err("mel filters", &e))?;
        let mel_filters =
            read_mel_filters(&mel_bytes, &config).map_err(|e| init_err("mel filters", &e))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| init_err("weights", &e))?
        };

        let model =
            m::model::Whisper::load(&vb, config.clone()).map_err(|e| init_err("model", &e))?;

        tracing::info!(model = model_id, "Candle Whisper model loaded");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
        })
    }

    fn transcribe(&self, pcm: &[f32], language: &str) -> Result<String, InferenceError> {
        let chunk_samples = m::N_SAMPLES;
        let prompt = self.prompt_tokens(language)?;

        let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        let mut segments: Vec<String> = Vec::new();

        for (i, chunk) in pcm.chunks(chunk_samples).enumerate() {
            let mut samples = chunk.to_vec();
            samples.resize(chunk_samples, 0.0);

            let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
            let n_mel = self.config.num_mel_bins;
            let n_frames = mel_data.len() / n_mel;

            let mel = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
                .map_err(|e| InferenceError::Failed(format!("mel tensor: {}", e)))?;

            tracing::debug!(segment = i, "Transcribing audio segment");
            let text = self.decode_segment(&mut model, &prompt, &mel)?;
            if !text.is_empty() {
                segments.push(text);
            }
        }

        let transcript = segments.join(" ");
        tracing::debug!(
            segments = segments.len(),
            chars = transcript.len(),
            "Whisper transcription completed"
        );

        Ok(transcript)
    }

    /// Start-of-transcript prefix, with a language token when the vocabulary has one.
    fn prompt_tokens(&self, language: &str) -> Result<Vec<u32>, InferenceError> {
        let mut tokens = vec![self.token_id(m::SOT_TOKEN)?];

        let language_token = format!("<|{}|>", language.trim().to_lowercase());
        match self.tokenizer.token_to_id(&language_token) {
            Some(id) => tokens.push(id),
            None => tracing::debug!(language, "No language token, letting the model detect it"),
        }

        tokens.push(self.token_id(m::TRANSCRIBE_TOKEN)?);
        tokens.push(self.token_id(m::NO_TIMESTAMPS_TOKEN)?);
        Ok(tokens)
    }

    fn decode_segment(
        &self,
        model: &mut m::model::Whisper,
        prompt: &[u32],
        mel: &Tensor,
    ) -> Result<String, InferenceError> {
        let failed = |e: candle_core::Error| InferenceError::Failed(e.to_string());
        let eot_token = self.token_id(m::EOT_TOKEN)?;

        let audio_features = model
            .encoder
            .forward(mel, true)
            .map_err(|e| InferenceError::Failed(format!("encoder: {}", e)))?;

        let mut tokens = prompt.to_vec();

        for _ in 0..MAX_DECODE_TOKENS {
            let token_tensor = Tensor::new(tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(failed)?;

            let decoder_output = model
                .decoder
                .forward(&token_tensor, &audio_features, tokens.len() == prompt.len())
                .map_err(|e| InferenceError::Failed(format!("decoder: {}", e)))?;

            let logits = model
                .decoder
                .final_linear(&decoder_output.squeeze(0).map_err(failed)?)
                .map_err(|e| InferenceError::Failed(format!("linear: {}", e)))?;

            let seq_len = logits.dim(0).map_err(failed)?;
            let next_token = logits
                .get(seq_len - 1)
                .and_then(|last| last.argmax(0))
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(failed)?;

            if next_token == eot_token {
                break;
            }
            tokens.push(next_token);
        }

        model.reset_kv_cache();

        let text = self
            .tokenizer
            .decode(&tokens[prompt.len()..], true)
            .map_err(|e| InferenceError::Failed(format!("detokenize: {}", e)))?;

        Ok(text.trim().to_string())
    }

    fn token_id(&self, token: &str) -> Result<u32, InferenceError> {
        self.tokenizer
            .token_to_id(token)
            .ok_or_else(|| InferenceError::Failed(format!("token not found: {}", token)))
    }
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, String> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(format!(
            "file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        ));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}
