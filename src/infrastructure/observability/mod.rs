mod init_tracing;
mod text_preview;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use text_preview::preview_text;
pub use tracing_config::TracingConfig;
