//! Tubeloader library

pub mod downloader;
pub mod input;
pub mod models;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{download_video, DownloadBackend, EngineOptions, YtDlpBackend};
pub use input::{collect_request, CollectMode, Prompter};
pub use models::{Container, DownloadRequest, Quality};
pub use utils::{ConfigDocument, Preset, TubeloaderError};
