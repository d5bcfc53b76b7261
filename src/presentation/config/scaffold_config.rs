const DEFAULT_MOCK_TRANSCRIPT: &str = "trascrizione di prova";

/// Configuration for scaffold mode operation.
#[derive(Debug, Clone)]
pub struct ScaffoldConfig {
    pub enabled: bool,
    pub mock_response_delay_ms: u64,
    pub mock_transcript: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            enabled: std::env::var("SCAFFOLD_MODE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            mock_response_delay_ms: std::env::var("MOCK_RESPONSE_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            mock_transcript: std::env::var("MOCK_TRANSCRIPT")
                .unwrap_or_else(|_| DEFAULT_MOCK_TRANSCRIPT.to_string()),
        }
    }
}

impl ScaffoldConfig {
    pub fn enabled_with(transcript: impl Into<String>) -> Self {
        Self {
            enabled: true,
            mock_response_delay_ms: 0,
            mock_transcript: transcript.into(),
        }
    }
}
