use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::AsrBackend;
use crate::application::services::EvaluationReport;
use crate::application::services::metrics::format_rate;
use crate::presentation::state::AppState;

use super::{CliError, read_audio};

/// Evaluates every file in `dir` that has an entry in the references JSON.
///
/// With `output` the report is written there and a summary is returned;
/// otherwise the report itself is returned.
pub async fn evaluate_directory(
    state: &AppState,
    dir: &Path,
    references_path: &Path,
    output: Option<&Path>,
) -> Result<String, CliError> {
    let references = read_references(references_path).await?;
    let backends: Vec<Arc<dyn AsrBackend>> = state.backends.values().cloned().collect();
    let max_bytes = state.settings.audio.max_file_size_bytes() as u64;

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    while let Some(entry) = entries.next_entry().await.map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if references.contains_key(&name) {
            names.push(name);
        } else {
            tracing::debug!(file = %name, "No reference, skipping");
        }
    }
    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in &names {
        let audio = read_audio(&dir.join(name), max_bytes).await?;
        let reference = &references[name];
        files.push(
            state
                .evaluation_service
                .evaluate(name, audio, reference, &backends)
                .await,
        );
    }

    let report = EvaluationReport::from_files(files);
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .map_err(|source| CliError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(render_summary(&report))
        }
        None => Ok(json),
    }
}

async fn read_references(path: &Path) -> Result<BTreeMap<String, String>, CliError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&contents).map_err(|e| CliError::References {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn render_summary(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} files, {} failed runs",
        report.files.len(),
        report.failure_count()
    );
    for family in &report.summary {
        let _ = writeln!(
            out,
            "{:<9} WER {}  CER {}  time {:.2} s",
            family.family.as_str(),
            format_rate(family.mean_wer),
            format_rate(family.mean_cer),
            family.mean_inference_time
        );
    }
    out
}
