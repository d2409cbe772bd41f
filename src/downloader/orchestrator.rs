//! Turns a `DownloadRequest` into one engine invocation

use crate::downloader::options::{EngineOptions, PlaylistOptions};
use crate::downloader::traits::{DownloadBackend, ProgressHook};
use crate::models::DownloadRequest;
use crate::utils::error::TubeloaderError;
use tracing::{error, info};

/// Options the engine will receive for `request`, playlist overrides included
pub fn build_options(request: &DownloadRequest) -> EngineOptions {
    EngineOptions::from_request(request).with_overrides(&PlaylistOptions::from_request(request))
}

/// Run a single download attempt. There is no retry at this layer.
///
/// Every failure is logged here; the caller only has to show
/// `TubeloaderError::user_message` to the user.
pub async fn download_video(
    backend: &dyn DownloadBackend,
    request: &DownloadRequest,
    progress: &mut ProgressHook<'_>,
) -> Result<(), TubeloaderError> {
    let result = run(backend, request, progress).await;
    if let Err(e) = &result {
        log_failure(e);
    }
    result
}

async fn run(
    backend: &dyn DownloadBackend,
    request: &DownloadRequest,
    progress: &mut ProgressHook<'_>,
) -> Result<(), TubeloaderError> {
    tokio::fs::create_dir_all(&request.output_dir)
        .await
        .map_err(|e| {
            TubeloaderError::Filesystem(format!(
                "cannot create {}: {}",
                request.output_dir.display(),
                e
            ))
        })?;

    let options = build_options(request);
    info!(
        "Starting {} download of {} (format '{}', playlist: {}, items: {:?})",
        backend.id(),
        request.link,
        options.format,
        options.yes_playlist,
        options.playlist_items
    );

    backend.download(&request.link, &options, progress).await?;
    info!("Download of {} completed", request.link);
    Ok(())
}

fn log_failure(err: &TubeloaderError) {
    match err {
        TubeloaderError::Network(msg) => error!("Network error: {}", msg),
        TubeloaderError::Download(msg) => error!("Download error: {}", msg),
        TubeloaderError::Playlist(msg) => error!("Playlist download error: {}", msg),
        TubeloaderError::Filesystem(msg) => error!("File error: {}", msg),
        other => error!("An unexpected error occurred: {:?}", other),
    }
}
