//! Error handling for Tubeloader

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tubeloader
#[derive(Debug, Error)]
pub enum TubeloaderError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Failed to create configuration file {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read configuration file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No templates found in the configuration file")]
    NoTemplates,

    #[error("Gave up on {field} after {attempts} invalid attempts")]
    RetryExhausted { field: String, attempts: usize },

    #[error("Input closed before a value was entered")]
    InputClosed,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Playlist download error: {0}")]
    Playlist(String),

    #[error("File error: {0}")]
    Filesystem(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TubeloaderError {
    /// Console text shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            TubeloaderError::Network(msg) => {
                format!("Network error: {}. Please check your internet connection.", msg)
            }
            TubeloaderError::Download(msg) => {
                format!("Download error: {}. Please check the URL or try again later.", msg)
            }
            TubeloaderError::Playlist(msg) => format!(
                "Playlist download error: {}. Please check the playlist URL and video indices.",
                msg
            ),
            TubeloaderError::Filesystem(msg) => {
                format!("File error: {}. Please check the output directory.", msg)
            }
            TubeloaderError::YtDlpNotFound => {
                "yt-dlp was not found. Install it with `pip install yt-dlp` or your package manager."
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether this error came out of the download attempt rather than setup or input
    pub fn is_download_failure(&self) -> bool {
        matches!(
            self,
            TubeloaderError::Network(_)
                | TubeloaderError::Download(_)
                | TubeloaderError::Playlist(_)
                | TubeloaderError::Filesystem(_)
                | TubeloaderError::Unexpected(_)
                | TubeloaderError::YtDlpNotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_tailored() {
        let network = TubeloaderError::Network("timed out".into()).user_message();
        assert!(network.contains("internet connection"));

        let playlist = TubeloaderError::Playlist("bad index".into()).user_message();
        assert!(playlist.contains("video indices"));

        let file = TubeloaderError::Filesystem("Permission denied".into()).user_message();
        assert!(file.contains("output directory"));

        let download = TubeloaderError::Download("Video unavailable".into()).user_message();
        assert!(download.starts_with("Download error: Video unavailable"));

        let unexpected = TubeloaderError::Unexpected("boom".into()).user_message();
        assert_eq!(unexpected, "An unexpected error occurred: boom");
    }

    #[test]
    fn test_retry_exhausted_names_field() {
        let err = TubeloaderError::RetryExhausted {
            field: "link".into(),
            attempts: 3,
        };
        assert_eq!(err.to_string(), "Gave up on link after 3 invalid attempts");
        assert!(!err.is_download_failure());
    }

    #[test]
    fn test_download_failure_categories() {
        assert!(TubeloaderError::Network(String::new()).is_download_failure());
        assert!(TubeloaderError::YtDlpNotFound.is_download_failure());
        assert!(!TubeloaderError::NoTemplates.is_download_failure());
        assert!(!TubeloaderError::InputClosed.is_download_failure());
    }
}
