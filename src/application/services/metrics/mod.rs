mod alignment;
mod metrics_display;
mod metrics_engine;
mod sequence_matcher;
mod text_normalizer;

pub use alignment::{Alignment, EditOp, align, edit_distance};
pub use metrics_display::{MetricsDisplay, format_duration, format_rate};
pub use metrics_engine::{
    DEFAULT_MAX_INPUT_CHARS, MetricsEngine, MetricsInputError, validate_text_input,
};
pub use sequence_matcher::{MatchingBlock, matching_blocks, similarity_ratio};
pub use text_normalizer::{normalize_text, words};
