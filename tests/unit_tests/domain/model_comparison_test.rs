use std::time::Duration;

use ascolto::domain::{BackendFamily, EvaluationMetrics, ModelRun, compare};

use crate::helpers::assert_close;

fn metrics_with_wer(wer: f64) -> EvaluationMetrics {
    EvaluationMetrics {
        wer,
        cer: wer / 2.0,
        word_substitutions: 0,
        word_deletions: 0,
        word_insertions: 0,
        word_hits: 0,
        similarity_ratio: 1.0 - wer,
        accuracy: (1.0 - wer).max(0.0),
        word_count_reference: 10,
        word_count_hypothesis: 10,
        char_count_reference: 50,
        char_count_hypothesis: 50,
    }
}

fn run(family: BackendFamily, key: &str, wer: f64, millis: u64) -> ModelRun {
    ModelRun {
        family,
        model_key: key.to_string(),
        text: String::new(),
        metrics: metrics_with_wer(wer),
        inference_time: Duration::from_millis(millis),
    }
}

#[test]
fn given_run_with_zero_time_when_scoring_then_score_is_zero() {
    assert_eq!(run(BackendFamily::Whisper, "base", 0.1, 0).score(), 0.0);
}

#[test]
fn given_run_when_scoring_then_divides_accuracy_by_seconds() {
    assert_close(run(BackendFamily::Whisper, "base", 0.2, 2000).score(), 0.4);
}

#[test]
fn given_no_runs_when_comparing_then_returns_none() {
    assert!(compare(&[]).is_none());
}

#[test]
fn given_faster_and_more_accurate_run_when_comparing_then_it_wins() {
    let runs = [
        run(BackendFamily::Wav2Vec2, "facebook", 0.5, 2000),
        run(BackendFamily::Whisper, "base", 0.25, 1000),
    ];

    let comparison = compare(&runs).unwrap();

    assert_eq!(comparison.winner, BackendFamily::Whisper);
    assert_eq!(comparison.winner_model, "base");
    assert_close(comparison.winner_score, 0.75);
    assert_close(comparison.improvement, 0.5);
}

#[test]
fn given_equal_scores_when_comparing_then_later_run_wins() {
    let runs = [
        run(BackendFamily::Wav2Vec2, "facebook", 0.5, 1000),
        run(BackendFamily::Whisper, "base", 0.5, 1000),
    ];

    assert_eq!(compare(&runs).unwrap().winner, BackendFamily::Whisper);
}

#[test]
fn given_all_perfect_runs_when_comparing_then_improvement_is_zero() {
    let runs = [
        run(BackendFamily::Wav2Vec2, "facebook", 0.0, 1000),
        run(BackendFamily::Whisper, "base", 0.0, 500),
    ];

    assert_eq!(compare(&runs).unwrap().improvement, 0.0);
}
