use clap::Parser;

use ascolto::domain::BackendFamily;
use ascolto::presentation::cli::{Cli, Command, FamilyArg, render_models};

use crate::helpers::test_model_manager;

#[test]
fn given_transcribe_args_when_parsing_then_defaults_to_whisper() {
    let cli = Cli::try_parse_from(["ascolto", "transcribe", "clip.wav"]).unwrap();

    match cli.command {
        Command::Transcribe {
            file,
            family,
            model,
            reference,
            json,
        } => {
            assert_eq!(file.to_str(), Some("clip.wav"));
            assert_eq!(family, FamilyArg::Whisper);
            assert!(model.is_none());
            assert!(reference.is_none());
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_all_transcribe_flags_when_parsing_then_reads_them() {
    let cli = Cli::try_parse_from([
        "ascolto",
        "transcribe",
        "clip.mp3",
        "--family",
        "wav2vec2",
        "--model",
        "jonatas",
        "--reference",
        "buongiorno a tutti",
        "--json",
    ])
    .unwrap();

    let Command::Transcribe {
        family,
        model,
        reference,
        json,
        ..
    } = cli.command
    else {
        panic!("expected transcribe");
    };
    assert_eq!(BackendFamily::from(family), BackendFamily::Wav2Vec2);
    assert_eq!(model.as_deref(), Some("jonatas"));
    assert_eq!(reference.as_deref(), Some("buongiorno a tutti"));
    assert!(json);
}

#[test]
fn given_unknown_family_when_parsing_then_fails() {
    let result = Cli::try_parse_from(["ascolto", "models", "--family", "deepspeech"]);

    assert!(result.is_err());
}

#[test]
fn given_evaluate_without_references_when_parsing_then_fails() {
    assert!(Cli::try_parse_from(["ascolto", "evaluate", "clips/"]).is_err());
}

#[test]
fn given_registry_when_rendering_models_then_stars_active_model() {
    let manager = test_model_manager();

    let rendered = render_models(&manager, Some(BackendFamily::Whisper));

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "whisper (active: base)");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("  * base"));
    assert!(lines[2].starts_with("    small"));
    assert!(lines[3].contains("openai/whisper-tiny"));
}

#[test]
fn given_no_family_filter_when_rendering_models_then_lists_every_family() {
    let rendered = render_models(&test_model_manager(), None);

    assert!(rendered.contains("wav2vec2 (active: facebook)"));
    assert!(rendered.contains("whisper (active: base)"));
}
