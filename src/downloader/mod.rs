//! Download orchestration on top of yt-dlp

pub mod format;
pub mod options;
pub mod orchestrator;
pub mod progress;
pub mod traits;
pub mod ytdlp;

// Re-export for convenience
pub use format::{format_selector, quality_selector};
pub use options::{EngineOptions, PlaylistOptions};
pub use orchestrator::{build_options, download_video};
pub use progress::{ConsoleProgress, DownloadProgress, DownloadStatus};
pub use traits::{DownloadBackend, ProgressHook};
pub use ytdlp::YtDlpBackend;
