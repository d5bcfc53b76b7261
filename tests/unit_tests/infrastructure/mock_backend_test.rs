use ascolto::application::ports::{AsrBackend, BackendLoadError, BackendState, InferenceError};
use ascolto::domain::BackendFamily;
use ascolto::infrastructure::asr::MockAsrBackend;

use crate::helpers::{wav2vec2_descriptor, whisper_descriptor};

#[tokio::test]
async fn given_no_loaded_model_when_transcribing_then_loads_requested_model() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "ciao");
    let base = whisper_descriptor("base");

    let text = backend.transcribe(&base, &[0.0; 16]).await.unwrap();

    assert_eq!(text, "ciao");
    assert_eq!(backend.load_count(), 1);
    assert_eq!(backend.state(), BackendState::Ready(base));
}

#[tokio::test]
async fn given_failing_model_when_transcribing_then_model_unavailable() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "ciao").failing_on("small");

    let result = backend.transcribe(&whisper_descriptor("small"), &[0.0; 16]).await;

    assert!(matches!(
        result,
        Err(InferenceError::ModelUnavailable(
            BackendLoadError::Initialization { .. }
        ))
    ));
    assert_eq!(backend.transcription_count(), 0);
}

#[tokio::test]
async fn given_other_model_loaded_since_when_transcribing_then_runs_requested_model() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "modello {model}");
    let base = whisper_descriptor("base");
    backend.load(&base, false).await.unwrap();
    backend.load(&whisper_descriptor("small"), false).await.unwrap();

    let text = backend.transcribe(&base, &[0.0; 16]).await.unwrap();

    assert_eq!(text, "modello base");
    assert_eq!(backend.load_count(), 3);
    assert_eq!(backend.current_descriptor(), Some(base));
}

#[tokio::test]
async fn given_loaded_model_when_transcribing_then_returns_scripted_text() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "ciao mondo");
    let base = whisper_descriptor("base");
    backend.load(&base, false).await.unwrap();

    let text = backend.transcribe(&base, &[0.0; 16]).await.unwrap();

    assert_eq!(text, "ciao mondo");
    assert_eq!(backend.transcription_count(), 1);
    assert_eq!(backend.current_descriptor().unwrap().key, "base");
}

#[tokio::test]
async fn given_new_transcript_when_transcribing_then_returns_it() {
    let backend = MockAsrBackend::new(BackendFamily::Wav2Vec2, "prima");
    let facebook = wav2vec2_descriptor("facebook");
    backend.load(&facebook, false).await.unwrap();

    backend.set_transcript("seconda");

    assert_eq!(backend.transcribe(&facebook, &[]).await.unwrap(), "seconda");
}

#[tokio::test]
async fn given_descriptor_of_other_family_when_loading_then_wrong_family() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "");

    let result = backend.load(&wav2vec2_descriptor("facebook"), false).await;

    assert!(matches!(
        result,
        Err(BackendLoadError::WrongFamily {
            expected: BackendFamily::Whisper,
            ..
        })
    ));
    assert_eq!(backend.load_count(), 0);
}

#[tokio::test]
async fn given_failing_model_when_loading_then_keeps_previous_model() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "").failing_on("small");
    let base = whisper_descriptor("base");
    backend.load(&base, false).await.unwrap();

    let result = backend.load(&whisper_descriptor("small"), false).await;

    assert!(matches!(result, Err(BackendLoadError::Initialization { .. })));
    assert_eq!(backend.load_count(), 2);
    assert_eq!(backend.state(), BackendState::Ready(base));
}

#[tokio::test]
async fn given_repeated_loads_of_same_model_when_loading_then_loads_once() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "");
    let base = whisper_descriptor("base");

    backend.load(&base, false).await.unwrap();
    backend.load(&base, false).await.unwrap();
    backend.load(&base, true).await.unwrap();

    assert_eq!(backend.load_count(), 2);
}

#[tokio::test]
async fn given_descriptor_of_other_family_when_transcribing_then_wrong_family() {
    let backend = MockAsrBackend::new(BackendFamily::Whisper, "");

    let result = backend
        .transcribe(&wav2vec2_descriptor("facebook"), &[0.0; 16])
        .await;

    assert!(matches!(
        result,
        Err(InferenceError::ModelUnavailable(BackendLoadError::WrongFamily { .. }))
    ));
}
