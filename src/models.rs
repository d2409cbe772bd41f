//! Data structures shared by the prompts, the preset store and the downloader

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Coarse resolution ceiling for the video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Best,
    High,
    Medium,
    Low,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::Best, Quality::High, Quality::Medium, Quality::Low];

    /// Maximum video height, `None` meaning no ceiling
    pub fn max_height(self) -> Option<u32> {
        match self {
            Quality::Best => None,
            Quality::High => Some(720),
            Quality::Medium => Some(480),
            Quality::Low => Some(360),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" => Ok(Quality::Best),
            "high" => Ok(Quality::High),
            "medium" => Ok(Quality::Medium),
            "low" => Ok(Quality::Low),
            other => Err(format!("unknown quality '{}'", other)),
        }
    }
}

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Webm,
    Mp3,
}

impl Container {
    pub const ALL: [Container; 3] = [Container::Mp4, Container::Webm, Container::Mp3];

    /// File extension as understood by yt-dlp's `[ext=...]` filter
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::Webm => "webm",
            Container::Mp3 => "mp3",
        }
    }

    pub fn is_audio_only(self) -> bool {
        matches!(self, Container::Mp3)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Container {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Container::Mp4),
            "webm" => Ok(Container::Webm),
            "mp3" => Ok(Container::Mp3),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

/// Everything the orchestrator needs for one download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub link: String,
    pub output_dir: PathBuf,
    pub quality: Quality,
    pub container: Container,
    pub is_playlist: bool,
    pub download_subs: bool,
    /// Playlist entries to fetch, kept exactly as the user typed them (e.g. "1,3,5-7")
    pub playlist_items: Option<String>,
}
