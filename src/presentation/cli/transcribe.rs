use std::fmt::Write;
use std::path::PathBuf;

use crate::application::services::metrics::{MetricsDisplay, format_duration};
use crate::domain::{BackendFamily, TranscriptionResult};
use crate::presentation::state::AppState;

use super::{CliError, read_audio};

#[derive(Debug, Clone)]
pub struct TranscribeRequest {
    pub file: PathBuf,
    pub family: BackendFamily,
    pub model: Option<String>,
    pub reference: Option<String>,
    pub json: bool,
}

#[tracing::instrument(
    skip(state, request),
    fields(family = %request.family, file = %request.file.display())
)]
pub async fn transcribe_file(
    state: &AppState,
    request: TranscribeRequest,
) -> Result<String, CliError> {
    let backend = state
        .backend(request.family)
        .ok_or(CliError::UnknownBackend(request.family))?;

    if let Some(key) = &request.model {
        state.model_manager.set_active(request.family, key)?;
    }

    let max_bytes = state.settings.audio.max_file_size_bytes() as u64;
    let audio = read_audio(&request.file, max_bytes).await?;

    let result = state
        .pipeline
        .transcribe(audio, backend.as_ref(), request.reference.as_deref())
        .await?;

    if request.json {
        Ok(serde_json::to_string_pretty(&result)?)
    } else {
        Ok(render_result(&result))
    }
}

pub fn render_result(result: &TranscriptionResult) -> String {
    let mut out = String::new();
    let model = &result.model_info;

    let _ = writeln!(out, "Model:          {} ({})", model.display_name, model.key);
    let _ = writeln!(out, "Text:           {}", result.text);

    match &result.metrics {
        Some(metrics) => {
            let _ = write!(out, "{}", MetricsDisplay::new(metrics, Some(result.inference_time)));
        }
        None => {
            let _ = writeln!(
                out,
                "Inference Time: {}",
                format_duration(result.inference_time)
            );
        }
    }

    out
}
