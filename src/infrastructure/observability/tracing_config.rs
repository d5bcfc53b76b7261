use crate::presentation::config::{Environment, LoggingSettings};

const DEFAULT_LEVEL: &str = "info";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub level: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            level: DEFAULT_LEVEL.to_string(),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        }
    }
}

impl TracingConfig {
    pub fn from_settings(logging: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment: environment.to_string(),
            level: logging.level.clone(),
            json_format: logging.json_format,
        }
    }

    /// Filter used when `RUST_LOG` is unset: the configured level, with the
    /// crate's own events at debug unless the level is stricter.
    pub fn default_filter(&self) -> String {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" => format!("{},ascolto=debug", self.level),
            _ => self.level.clone(),
        }
    }
}
