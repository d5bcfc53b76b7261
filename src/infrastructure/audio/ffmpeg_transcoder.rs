use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, TranscodeError};
use crate::domain::AudioFormat;

const STDERR_TAIL_CHARS: usize = 400;

/// Runs the `ffmpeg` CLI to produce mono 16-bit 16 kHz WAV.
///
/// Input and output live in per-call temporary files that are removed when the
/// call returns or is dropped; the child is killed if the call is abandoned.
pub struct FfmpegTranscoder {
    binary: PathBuf,
    timeout: Duration,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(&self, data: &[u8], hint: AudioFormat) -> Result<Vec<u8>, TranscodeError> {
        let suffix = hint
            .extension()
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let payload = data.to_vec();
        let (input, output) = tokio::task::spawn_blocking(move || stage_files(&payload, &suffix))
            .await
            .map_err(|e| TranscodeError::Io(std::io::Error::other(e)))??;

        let mut command = Command::new(&self.binary);
        command
            .args(["-nostdin", "-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(input.path())
            .args([
                "-vn", "-acodec", "pcm_s16le", "-ac", "1", "-ar", "16000", "-f", "wav",
            ])
            .arg(output.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            binary = %self.binary.display(),
            format = %hint,
            bytes = data.len(),
            "Transcoding audio with ffmpeg"
        );

        let child = command.spawn().map_err(|e| spawn_error(&self.binary, e))?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| TranscodeError::Timeout(self.timeout))??;

        if !result.status.success() {
            return Err(TranscodeError::ProcessFailed {
                status: result.status.to_string(),
                stderr: stderr_tail(&result.stderr),
            });
        }

        let wav = tokio::fs::read(output.path()).await?;
        if wav.is_empty() {
            return Err(TranscodeError::EmptyOutput);
        }

        Ok(wav)
    }
}

/// Creates the per-call input and output files and writes the payload.
fn stage_files(payload: &[u8], suffix: &str) -> std::io::Result<(NamedTempFile, NamedTempFile)> {
    let mut input = tempfile::Builder::new()
        .prefix("ascolto-in-")
        .suffix(suffix)
        .tempfile()?;
    input.write_all(payload)?;
    input.flush()?;

    let output = tempfile::Builder::new()
        .prefix("ascolto-out-")
        .suffix(".wav")
        .tempfile()?;

    Ok((input, output))
}

/// Verifies that the binary exists and runs.
pub fn check_ffmpeg_binary(binary: &Path) -> Result<(), TranscodeError> {
    let output = std::process::Command::new(binary)
        .arg("-version")
        .output()
        .map_err(|e| spawn_error(binary, e))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(TranscodeError::ProcessFailed {
            status: output.status.to_string(),
            stderr: stderr_tail(&output.stderr),
        })
    }
}

fn spawn_error(binary: &Path, e: std::io::Error) -> TranscodeError {
    if e.kind() == std::io::ErrorKind::NotFound {
        TranscodeError::BinaryNotFound(binary.display().to_string())
    } else {
        TranscodeError::Io(e)
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    let count = trimmed.chars().count();
    if count > STDERR_TAIL_CHARS {
        trimmed.chars().skip(count - STDERR_TAIL_CHARS).collect()
    } else {
        trimmed.to_string()
    }
}
