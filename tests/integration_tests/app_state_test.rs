use std::path::Path;

use ascolto::domain::BackendFamily;
use ascolto::infrastructure::audio::encode_wav_pcm16;
use ascolto::presentation::cli::{CliError, Command, FamilyArg, run};
use ascolto::presentation::config::{Environment, Settings};
use ascolto::presentation::{AppState, ScaffoldConfig};

use crate::helpers::sine_wave;

fn settings() -> Settings {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    Settings::load_from(&dir, Environment::Test).unwrap()
}

fn scaffold_state(transcript: &str) -> AppState {
    AppState::from_settings(settings(), ScaffoldConfig::enabled_with(transcript)).unwrap()
}

fn write_wav(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode_wav_pcm16(&sine_wave(220.0, 16_000, 0.25), 16_000)).unwrap();
    path
}

fn transcribe(file: std::path::PathBuf, reference: Option<&str>, json: bool) -> Command {
    Command::Transcribe {
        file,
        family: FamilyArg::Whisper,
        model: None,
        reference: reference.map(str::to_string),
        json,
    }
}

#[tokio::test]
async fn given_scaffold_mode_when_building_state_then_every_family_has_a_backend() {
    let state = scaffold_state("ciao");

    assert!(state.backend(BackendFamily::Whisper).is_some());
    assert!(state.backend(BackendFamily::Wav2Vec2).is_some());
    assert!(state.scaffold_config.enabled);
}

#[tokio::test]
async fn given_audio_file_when_running_transcribe_then_prints_text() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_wav(dir.path(), "clip.wav");
    let state = scaffold_state("il gatto nero");

    let output = run(transcribe(file, None, false), &state).await.unwrap();

    assert!(output.contains("Model:          Whisper Base (base)"));
    assert!(output.contains("Text:           Il gatto nero."));
    assert!(output.contains("Inference Time: "));
}

#[tokio::test]
async fn given_reference_when_running_transcribe_then_prints_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_wav(dir.path(), "clip.wav");
    let state = scaffold_state("il gatto bianco");

    let output = run(transcribe(file, Some("il gatto nero"), false), &state)
        .await
        .unwrap();

    assert!(output.contains("WER            0.333 (33.3%)"));
    assert!(output.contains("Errors         S: 1, D: 0, I: 0"));
}

#[tokio::test]
async fn given_json_flag_when_running_transcribe_then_prints_result_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_wav(dir.path(), "clip.wav");
    let state = scaffold_state("il gatto nero");

    let output = run(transcribe(file, Some("il gatto nero"), true), &state)
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["text"], "Il gatto nero.");
    assert_eq!(json["model_info"]["key"], "base");
    assert_eq!(json["metrics"]["wer"], 0.0);
}

#[tokio::test]
async fn given_model_flag_when_running_transcribe_then_switches_active_model() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_wav(dir.path(), "clip.wav");
    let state = scaffold_state("ciao");

    let command = Command::Transcribe {
        file,
        family: FamilyArg::Whisper,
        model: Some("tiny".to_string()),
        reference: None,
        json: false,
    };
    let output = run(command, &state).await.unwrap();

    assert!(output.contains("(tiny)"));
    assert_eq!(
        state.model_manager.active_key(BackendFamily::Whisper).unwrap(),
        "tiny"
    );
}

#[tokio::test]
async fn given_unknown_model_flag_when_running_transcribe_then_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_wav(dir.path(), "clip.wav");
    let state = scaffold_state("ciao");

    let command = Command::Transcribe {
        file,
        family: FamilyArg::Wav2vec2,
        model: Some("missing".to_string()),
        reference: None,
        json: false,
    };

    assert!(matches!(
        run(command, &state).await,
        Err(CliError::ModelNotFound(_))
    ));
}

#[tokio::test]
async fn given_file_over_size_limit_when_running_transcribe_then_refuses() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_wav(dir.path(), "clip.wav");
    let mut settings = settings();
    settings.audio.max_file_size_mb = 0;
    let state = AppState::from_settings(settings, ScaffoldConfig::enabled_with("ciao")).unwrap();

    let result = run(transcribe(file, None, false), &state).await;

    assert!(matches!(result, Err(CliError::FileTooLarge { max: 0, .. })));
}

#[tokio::test]
async fn given_missing_file_when_running_transcribe_then_io_error() {
    let state = scaffold_state("ciao");

    let result = run(
        transcribe("/nonexistent/clip.wav".into(), None, false),
        &state,
    )
    .await;

    assert!(matches!(result, Err(CliError::Io { .. })));
}

#[tokio::test]
async fn given_models_command_when_running_then_lists_registry() {
    let state = scaffold_state("ciao");

    let output = run(
        Command::Models {
            family: Some(FamilyArg::Wav2vec2),
        },
        &state,
    )
    .await
    .unwrap();

    assert!(output.starts_with("wav2vec2 (active: facebook)"));
    assert!(output.contains("jonatasgrosman/wav2vec2-large-xlsr-53-italian"));
    assert!(!output.contains("whisper"));
}

#[tokio::test]
async fn given_directory_with_references_when_evaluating_then_reports_referenced_files() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "a.wav");
    write_wav(dir.path(), "b.wav");
    let references = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(references.path(), r#"{ "a.wav": "il gatto nero" }"#).unwrap();
    let state = scaffold_state("il gatto nero");

    let output = run(
        Command::Evaluate {
            dir: dir.path().to_path_buf(),
            references: references.path().to_path_buf(),
            output: None,
        },
        &state,
    )
    .await
    .unwrap();

    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["file_name"], "a.wav");
    assert_eq!(files[0]["runs"].as_array().unwrap().len(), 2);
    assert_eq!(report["summary"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn given_output_path_when_evaluating_then_writes_report_and_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(dir.path(), "a.wav");
    let references = dir.path().join("references.json");
    std::fs::write(&references, r#"{ "a.wav": "il gatto nero" }"#).unwrap();
    let report_path = dir.path().join("report.json");
    let state = scaffold_state("il gatto nero");

    let output = run(
        Command::Evaluate {
            dir: dir.path().to_path_buf(),
            references,
            output: Some(report_path.clone()),
        },
        &state,
    )
    .await
    .unwrap();

    assert!(output.starts_with("1 files, 0 failed runs"));
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(written["files"][0]["comparison"]["improvement"], 0.0);
}

#[tokio::test]
async fn given_malformed_references_when_evaluating_then_fails() {
    let dir = tempfile::tempdir().unwrap();
    let references = dir.path().join("references.json");
    std::fs::write(&references, "[1, 2]").unwrap();
    let state = scaffold_state("ciao");

    let result = run(
        Command::Evaluate {
            dir: dir.path().to_path_buf(),
            references,
            output: None,
        },
        &state,
    )
    .await;

    assert!(matches!(result, Err(CliError::References { .. })));
}
