use std::path::Path;

use anyhow::Context;
use clap::Parser;

use ascolto::infrastructure::observability::{TracingConfig, init_tracing};
use ascolto::presentation::cli::{Cli, run};
use ascolto::presentation::{AppState, Environment, ScaffoldConfig, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load_from(Path::new("config"), environment)
        .context("Failed to load configuration")?;

    init_tracing(TracingConfig::from_settings(&settings.logging, environment));

    let state = AppState::from_settings(settings, ScaffoldConfig::default())?;
    let output = run(cli.command, &state).await?;
    print!("{output}");

    Ok(())
}
