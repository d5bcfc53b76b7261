pub mod cli;
pub mod config;
pub mod state;

pub use config::{Environment, ScaffoldConfig, Settings};
pub use state::{AppState, AppStateError};
