use ascolto::infrastructure::observability::TracingConfig;
use ascolto::presentation::config::{Environment, LoggingSettings};

fn config(level: &str) -> TracingConfig {
    TracingConfig::from_settings(
        &LoggingSettings {
            level: level.to_string(),
            json_format: true,
        },
        Environment::Test,
    )
}

#[test]
fn given_logging_settings_when_building_then_copies_them() {
    let config = config("warn");

    assert_eq!(config.environment, "Test");
    assert_eq!(config.level, "warn");
    assert!(config.json_format);
}

#[test]
fn given_permissive_level_when_building_filter_then_crate_logs_at_debug() {
    assert_eq!(config("info").default_filter(), "info,ascolto=debug");
    assert_eq!(config("trace").default_filter(), "trace,ascolto=debug");
}

#[test]
fn given_strict_level_when_building_filter_then_applies_everywhere() {
    assert_eq!(config("error").default_filter(), "error");
}
