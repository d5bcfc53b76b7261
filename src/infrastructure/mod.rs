pub mod asr;
pub mod audio;
pub mod observability;
