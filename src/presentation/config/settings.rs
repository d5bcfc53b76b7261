use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::Environment as EnvironmentSource;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::{ModelManager, ModelRegistryError};
use crate::domain::{BackendFamily, ModelDescriptor, QualityTier};
use crate::infrastructure::asr::WhisperDevice;

use super::Environment;

const CONFIG_DIR: &str = "config";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub audio: AudioSettings,
    pub pipeline: PipelineSettings,
    pub metrics: MetricsSettings,
    pub backends: BackendsSettings,
    pub models: ModelsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    pub target_sample_rate: u32,
    pub ffmpeg_path: PathBuf,
    pub transcode_timeout_secs: u64,
    pub max_file_size_mb: usize,
}

impl AudioSettings {
    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub empty_transcript_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendsSettings {
    pub whisper: WhisperSettings,
    pub wav2vec2: RemoteBackendSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhisperSettings {
    #[serde(default)]
    pub device: WhisperDevice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteBackendSettings {
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl RemoteBackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsSettings {
    pub wav2vec2: FamilyModels,
    pub whisper: FamilyModels,
}

impl ModelsSettings {
    pub fn iter(&self) -> impl Iterator<Item = (BackendFamily, &FamilyModels)> {
        [
            (BackendFamily::Wav2Vec2, &self.wav2vec2),
            (BackendFamily::Whisper, &self.whisper),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FamilyModels {
    pub active: String,
    pub entries: BTreeMap<String, ModelEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub backend_identifier: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub quality: QualityTier,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "it".to_string()
}

impl ModelEntry {
    pub fn to_descriptor(&self, family: BackendFamily, key: &str) -> ModelDescriptor {
        ModelDescriptor::new(family, key, self.backend_identifier.clone())
            .with_display_name(self.display_name.clone())
            .with_quality(self.quality)
            .with_language(self.language.clone())
            .with_details(self.description.clone(), self.size.clone())
    }
}

impl Settings {
    /// Reads `config/default.toml`, then `config/<environment>.toml` when
    /// present, then `APP__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env().map_err(ConfigError::Message)?;

        Self::load_from(Path::new(CONFIG_DIR), environment)
    }

    pub fn load_from(dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        let base = dir.join("default");
        let overlay = dir.join(environment.as_str().to_lowercase());

        Config::builder()
            .add_source(File::with_name(&base.to_string_lossy()))
            .add_source(File::with_name(&overlay.to_string_lossy()).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Builds the model registry with each family's configured active model.
    pub fn model_manager(&self) -> Result<ModelManager, ModelRegistryError> {
        let mut builder = ModelManager::builder();
        for (family, models) in self.models.iter() {
            for (key, entry) in &models.entries {
                builder = builder.register(entry.to_descriptor(family, key));
            }
            builder = builder.active(family, models.active.clone());
        }
        builder.build()
    }
}
