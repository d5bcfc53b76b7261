use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::ports::AsrBackend;
use crate::application::services::{
    AudioNormalizer, EvaluationService, MetricsEngine, ModelManager, ModelRegistryError,
    TranscriptPostprocessor, TranscriptionPipeline,
};
use crate::domain::BackendFamily;
use crate::infrastructure::asr::{BackendFactory, BackendFactoryError};
use crate::infrastructure::audio::{CascadingAudioDecoder, FfmpegTranscoder, check_ffmpeg_binary};
use crate::presentation::config::{ScaffoldConfig, Settings};

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("model registry: {0}")]
    Registry(#[from] ModelRegistryError),
    #[error("backend: {0}")]
    Backend(#[from] BackendFactoryError),
}

/// Everything a command needs, wired from settings.
#[derive(Clone)]
pub struct AppState {
    pub model_manager: Arc<ModelManager>,
    pub pipeline: Arc<TranscriptionPipeline>,
    pub evaluation_service: Arc<EvaluationService>,
    pub backends: BTreeMap<BackendFamily, Arc<dyn AsrBackend>>,
    pub settings: Settings,
    pub scaffold_config: ScaffoldConfig,
}

impl AppState {
    pub fn from_settings(
        settings: Settings,
        scaffold_config: ScaffoldConfig,
    ) -> Result<Self, AppStateError> {
        let model_manager = Arc::new(settings.model_manager()?);

        if let Err(e) = check_ffmpeg_binary(&settings.audio.ffmpeg_path) {
            tracing::warn!(error = %e, "ffmpeg unavailable, transcode fallback will fail");
        }
        let transcoder = Arc::new(FfmpegTranscoder::new(
            settings.audio.ffmpeg_path.clone(),
            settings.audio.transcode_timeout(),
        ));
        let decoder = Arc::new(CascadingAudioDecoder::new(transcoder));

        let pipeline = Arc::new(
            TranscriptionPipeline::new(decoder, Arc::clone(&model_manager))
                .with_normalizer(AudioNormalizer::new(settings.audio.target_sample_rate))
                .with_postprocessor(TranscriptPostprocessor::new(
                    settings.pipeline.empty_transcript_text.clone(),
                ))
                .with_metrics_engine(MetricsEngine::new(settings.metrics.max_input_chars)),
        );
        let evaluation_service = Arc::new(EvaluationService::new(Arc::clone(&pipeline)));

        let mut backends = BTreeMap::new();
        for family in model_manager.families() {
            let backend = BackendFactory::create(family, &settings, &scaffold_config)?;
            backends.insert(family, backend);
        }

        tracing::info!(
            families = backends.len(),
            scaffold = scaffold_config.enabled,
            "Application state initialized"
        );

        Ok(Self {
            model_manager,
            pipeline,
            evaluation_service,
            backends,
            settings,
            scaffold_config,
        })
    }

    pub fn backend(&self, family: BackendFamily) -> Option<&Arc<dyn AsrBackend>> {
        self.backends.get(&family)
    }
}
