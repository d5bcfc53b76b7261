use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::AsrBackend;
use crate::domain::{AudioBuffer, BackendFamily, ModelComparison, ModelRun, compare};

use super::transcription_pipeline::TranscriptionPipeline;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFailure {
    pub family: BackendFamily,
    pub stage: Option<String>,
    pub error: String,
}

/// Every backend's attempt at one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEvaluation {
    pub file_name: String,
    pub reference: String,
    pub runs: Vec<ModelRun>,
    pub failures: Vec<RunFailure>,
    pub comparison: Option<ModelComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummary {
    pub family: BackendFamily,
    pub files: usize,
    pub mean_wer: f64,
    pub mean_cer: f64,
    pub mean_inference_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub files: Vec<FileEvaluation>,
    pub summary: Vec<FamilySummary>,
}

impl EvaluationReport {
    pub fn from_files(files: Vec<FileEvaluation>) -> Self {
        let mut by_family: BTreeMap<BackendFamily, Vec<&ModelRun>> = BTreeMap::new();
        for run in files.iter().flat_map(|f| f.runs.iter()) {
            by_family.entry(run.family).or_default().push(run);
        }

        let summary = by_family
            .into_iter()
            .map(|(family, runs)| FamilySummary {
                family,
                files: runs.len(),
                mean_wer: mean(runs.iter().map(|r| r.metrics.wer)),
                mean_cer: mean(runs.iter().map(|r| r.metrics.cer)),
                mean_inference_time: mean(runs.iter().map(|r| r.inference_time.as_secs_f64())),
            })
            .collect();

        Self { files, summary }
    }

    pub fn failure_count(&self) -> usize {
        self.files.iter().map(|f| f.failures.len()).sum()
    }
}

/// Runs the same audio through several backends and compares them.
pub struct EvaluationService {
    pipeline: Arc<TranscriptionPipeline>,
}

impl EvaluationService {
    pub fn new(pipeline: Arc<TranscriptionPipeline>) -> Self {
        Self { pipeline }
    }

    /// Backend failures are recorded in the result rather than aborting the
    /// remaining backends.
    pub async fn evaluate(
        &self,
        file_name: &str,
        audio: AudioBuffer,
        reference: &str,
        backends: &[Arc<dyn AsrBackend>],
    ) -> FileEvaluation {
        let mut runs = Vec::with_capacity(backends.len());
        let mut failures = Vec::new();

        for backend in backends {
            let family = backend.family();
            match self
                .pipeline
                .transcribe(audio.clone(), backend.as_ref(), Some(reference))
                .await
            {
                Ok(result) => match ModelRun::from_result(result) {
                    Some(run) => {
                        tracing::info!(
                            file = file_name,
                            family = %family,
                            wer = run.metrics.wer,
                            "Evaluation run scored"
                        );
                        runs.push(run);
                    }
                    None => failures.push(RunFailure {
                        family,
                        stage: None,
                        error: "reference text is empty".to_string(),
                    }),
                },
                Err(e) => {
                    tracing::warn!(file = file_name, family = %family, error = %e, "Evaluation run failed");
                    failures.push(RunFailure {
                        family,
                        stage: Some(e.stage().to_string()),
                        error: e.to_string(),
                    });
                }
            }
        }

        FileEvaluation {
            file_name: file_name.to_string(),
            reference: reference.to_string(),
            comparison: compare(&runs),
            runs,
            failures,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
