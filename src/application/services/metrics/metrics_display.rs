use std::fmt;
use std::time::Duration;

use crate::domain::EvaluationMetrics;

/// Human-readable rendering of metrics for terminal output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsDisplay {
    entries: Vec<(&'static str, String)>,
}

impl MetricsDisplay {
    pub fn new(metrics: &EvaluationMetrics, inference_time: Option<Duration>) -> Self {
        let mut entries = vec![
            ("WER", format_rate(metrics.wer)),
            ("CER", format_rate(metrics.cer)),
            ("Accuracy", format_rate(metrics.accuracy)),
            ("Similarity", format_rate(metrics.similarity_ratio)),
            (
                "Words",
                format!(
                    "Ref: {}, Hyp: {}",
                    metrics.word_count_reference, metrics.word_count_hypothesis
                ),
            ),
            (
                "Errors",
                format!(
                    "S: {}, D: {}, I: {}",
                    metrics.word_substitutions, metrics.word_deletions, metrics.word_insertions
                ),
            ),
        ];
        if let Some(elapsed) = inference_time {
            entries.push(("Inference Time", format_duration(elapsed)));
        }
        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }
}

impl fmt::Display for MetricsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in &self.entries {
            writeln!(f, "{label:<15}{value}")?;
        }
        Ok(())
    }
}

pub fn format_rate(value: f64) -> String {
    if value.is_infinite() {
        return "inf".to_string();
    }
    format!("{:.3} ({:.1}%)", value, value * 100.0)
}

pub fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_secs_f64() * 1000.0;
    if millis < 1000.0 {
        format!("{millis:.1} ms")
    } else {
        format!("{:.2} s", elapsed.as_secs_f64())
    }
}
