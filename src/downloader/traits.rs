use crate::downloader::options::EngineOptions;
use crate::downloader::progress::DownloadProgress;
use crate::utils::error::TubeloaderError;
use async_trait::async_trait;

/// Progress hook invoked inline by the backend while a download runs
pub type ProgressHook<'a> = dyn FnMut(&DownloadProgress) + Send + 'a;

/// Core trait for download engines
///
/// This isolates the orchestrator from how the engine is reached (a yt-dlp
/// child process in production, a scripted fake in tests).
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    /// Returns a unique identifier for this backend (e.g., "yt-dlp")
    fn id(&self) -> &'static str;

    /// Download `url` with `options`, reporting progress through `progress`.
    ///
    /// Failures come back already classified (network, download, playlist,
    /// filesystem or unexpected).
    async fn download(
        &self,
        url: &str,
        options: &EngineOptions,
        progress: &mut ProgressHook<'_>,
    ) -> Result<(), TubeloaderError>;
}
