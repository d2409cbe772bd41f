//! Utility modules for error handling, presets and logging

pub mod config;
pub mod error;
pub mod logging;

// Re-export for convenience
pub use config::{load_config, select_template, ConfigDocument, Preset, Templates};
pub use error::TubeloaderError;
pub use logging::init_file_logging;
