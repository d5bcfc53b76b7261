mod evaluate;
mod models;
mod transcribe;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::services::{ModelNotFoundError, TranscriptionError};
use crate::domain::{AudioBuffer, BackendFamily};
use crate::presentation::state::AppState;

pub use evaluate::evaluate_directory;
pub use models::render_models;
pub use transcribe::{TranscribeRequest, render_result, transcribe_file};

#[derive(Parser, Debug)]
#[command(name = "ascolto")]
#[command(author, version, about = "Speech transcription with WER/CER evaluation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyArg {
    /// CTC models served by an inference endpoint
    Wav2vec2,
    /// Whisper models run locally
    Whisper,
}

impl From<FamilyArg> for BackendFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::Wav2vec2 => BackendFamily::Wav2Vec2,
            FamilyArg::Whisper => BackendFamily::Whisper,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transcribe an audio file
    Transcribe {
        /// Audio file in any supported container
        file: PathBuf,

        #[arg(long, value_enum, default_value = "whisper")]
        family: FamilyArg,

        /// Model key to activate before transcribing
        #[arg(long)]
        model: Option<String>,

        /// Ground-truth text; enables WER/CER
        #[arg(long)]
        reference: Option<String>,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List registered models and the active one per family
    Models {
        #[arg(long, value_enum)]
        family: Option<FamilyArg>,
    },

    /// Transcribe every referenced file in a directory with every backend
    Evaluate {
        dir: PathBuf,

        /// JSON object mapping file names to reference transcripts
        #[arg(long)]
        references: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("no backend configured for {0}")]
    UnknownBackend(BackendFamily),
    #[error("{0}")]
    ModelNotFound(#[from] ModelNotFoundError),
    #[error("{0}")]
    Transcription(#[from] TranscriptionError),
    #[error("references file {path}: {reason}")]
    References { path: PathBuf, reason: String },
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runs one command and returns what it prints.
pub async fn run(command: Command, state: &AppState) -> Result<String, CliError> {
    match command {
        Command::Transcribe {
            file,
            family,
            model,
            reference,
            json,
        } => {
            let request = TranscribeRequest {
                file,
                family: family.into(),
                model,
                reference,
                json,
            };
            transcribe_file(state, request).await
        }
        Command::Models { family } => Ok(render_models(
            &state.model_manager,
            family.map(BackendFamily::from),
        )),
        Command::Evaluate {
            dir,
            references,
            output,
        } => evaluate_directory(state, &dir, &references, output.as_deref()).await,
    }
}

/// Reads an audio file, refusing anything above `max_bytes`.
pub async fn read_audio(path: &Path, max_bytes: u64) -> Result<AudioBuffer, CliError> {
    let io_err = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
    if size > max_bytes {
        return Err(CliError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max: max_bytes,
        });
    }

    let data = tokio::fs::read(path).await.map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "Audio file read");
    Ok(AudioBuffer::from(data))
}
