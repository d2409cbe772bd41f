//! Engine option set and its rendering to yt-dlp arguments

use crate::downloader::format::format_selector;
use crate::models::DownloadRequest;
use std::path::{Path, PathBuf};

/// Browser identification sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Output file name inside the target directory
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub const SUBTITLE_LANGUAGE: &str = "en";
pub const SUBTITLE_FORMAT: &str = "srt";

/// Machine-readable progress line; fields are `|`-separated and `NA` when unknown
pub const PROGRESS_TEMPLATE: &str = "download:tubeloader|%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s";

/// Subtitle download settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleOptions {
    pub language: String,
    pub format: String,
}

impl Default for SubtitleOptions {
    fn default() -> Self {
        Self {
            language: SUBTITLE_LANGUAGE.to_string(),
            format: SUBTITLE_FORMAT.to_string(),
        }
    }
}

/// Caller-supplied overrides layered on top of the derived options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistOptions {
    /// Entries to fetch, e.g. "1,3,5-7"
    pub playlist_items: Option<String>,
}

impl PlaylistOptions {
    pub fn from_request(request: &DownloadRequest) -> Self {
        Self {
            playlist_items: request.playlist_items.clone(),
        }
    }
}

/// Everything handed to the download engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub yes_playlist: bool,
    pub format: String,
    pub output_template: PathBuf,
    pub user_agent: String,
    pub no_check_certificates: bool,
    pub quiet: bool,
    pub no_warnings: bool,
    /// `None` leaves subtitles alone
    pub subtitles: Option<SubtitleOptions>,
    /// Container for merged video+audio output
    pub merge_output_format: Option<String>,
    /// Convert the result to this audio codec
    pub extract_audio: Option<String>,
    pub playlist_items: Option<String>,
}

impl EngineOptions {
    /// Derive the option set for a request
    pub fn from_request(request: &DownloadRequest) -> Self {
        let container = request.container;
        Self {
            yes_playlist: request.is_playlist,
            format: format_selector(Some(request.quality), Some(container)),
            output_template: output_template(&request.output_dir),
            user_agent: USER_AGENT.to_string(),
            no_check_certificates: true,
            quiet: true,
            no_warnings: true,
            subtitles: request.download_subs.then(SubtitleOptions::default),
            merge_output_format: (!container.is_audio_only())
                .then(|| container.extension().to_string()),
            extract_audio: container
                .is_audio_only()
                .then(|| container.extension().to_string()),
            playlist_items: None,
        }
    }

    /// Layer `overrides` on top; any value they set wins
    pub fn with_overrides(mut self, overrides: &PlaylistOptions) -> Self {
        if let Some(items) = &overrides.playlist_items {
            self.playlist_items = Some(items.clone());
        }
        self
    }

    /// Render as yt-dlp command-line arguments, ending with `url`
    pub fn to_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            if self.yes_playlist {
                "--yes-playlist"
            } else {
                "--no-playlist"
            }
            .to_string(),
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            self.output_template.to_string_lossy().to_string(),
            "--user-agent".to_string(),
            self.user_agent.clone(),
        ];

        if self.no_check_certificates {
            args.push("--no-check-certificates".to_string());
        }
        if self.quiet {
            args.push("--quiet".to_string());
        }
        if self.no_warnings {
            args.push("--no-warnings".to_string());
        }

        // Progress must survive --quiet and arrive one line per update
        args.extend([
            "--progress".to_string(),
            "--newline".to_string(),
            "--progress-template".to_string(),
            PROGRESS_TEMPLATE.to_string(),
        ]);

        if let Some(subs) = &self.subtitles {
            args.extend([
                "--write-subs".to_string(),
                "--sub-langs".to_string(),
                subs.language.clone(),
                "--sub-format".to_string(),
                subs.format.clone(),
            ]);
        }
        if let Some(container) = &self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }
        if let Some(codec) = &self.extract_audio {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(codec.clone());
        }
        if let Some(items) = &self.playlist_items {
            args.push("--playlist-items".to_string());
            args.push(items.clone());
        }

        args.push(url.to_string());
        args
    }
}

/// `<dir>/%(title)s.%(ext)s`
pub fn output_template(dir: &Path) -> PathBuf {
    dir.join(OUTPUT_TEMPLATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Container, Quality};

    fn request() -> DownloadRequest {
        DownloadRequest {
            link: "https://www.youtube.com/watch?v=abc123".to_string(),
            output_dir: PathBuf::from("downloads"),
            quality: Quality::Medium,
            container: Container::Mp4,
            is_playlist: false,
            download_subs: false,
            playlist_items: None,
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_options_from_request() {
        let options = EngineOptions::from_request(&request());
        assert!(!options.yes_playlist);
        assert_eq!(
            options.format,
            "bv[height<=480][ext=mp4]+ba/b[height<=480][ext=mp4]"
        );
        assert_eq!(
            options.output_template,
            PathBuf::from("downloads").join("%(title)s.%(ext)s")
        );
        assert_eq!(options.user_agent, USER_AGENT);
        assert!(options.no_check_certificates);
        assert_eq!(options.subtitles, None);
        assert_eq!(options.merge_output_format.as_deref(), Some("mp4"));
        assert_eq!(options.extract_audio, None);
        assert_eq!(options.playlist_items, None);
    }

    #[test]
    fn test_mp3_extracts_audio() {
        let options = EngineOptions::from_request(&DownloadRequest {
            container: Container::Mp3,
            ..request()
        });
        assert_eq!(options.format, "ba");
        assert_eq!(options.extract_audio.as_deref(), Some("mp3"));
        assert_eq!(options.merge_output_format, None);
    }

    #[test]
    fn test_subtitles_use_fixed_language() {
        let options = EngineOptions::from_request(&DownloadRequest {
            download_subs: true,
            ..request()
        });
        let subs = options.subtitles.unwrap();
        assert_eq!(subs.language, "en");
        assert_eq!(subs.format, "srt");
    }

    #[test]
    fn test_overrides_win() {
        let overrides = PlaylistOptions {
            playlist_items: Some("1,3,5-7".to_string()),
        };
        let options = EngineOptions::from_request(&DownloadRequest {
            playlist_items: Some("2".to_string()),
            ..request()
        })
        .with_overrides(&overrides);
        assert_eq!(options.playlist_items.as_deref(), Some("1,3,5-7"));
    }

    #[test]
    fn test_playlist_flag_follows_request() {
        let options = EngineOptions::from_request(&DownloadRequest {
            is_playlist: true,
            ..request()
        })
        .with_overrides(&PlaylistOptions::default());
        assert!(options.yes_playlist);
        assert_eq!(options.playlist_items, None);
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let base = EngineOptions::from_request(&request());
        let merged = base.clone().with_overrides(&PlaylistOptions::default());
        assert_eq!(base, merged);
    }

    #[test]
    fn test_args_rendering() {
        let mut options = EngineOptions::from_request(&DownloadRequest {
            download_subs: true,
            ..request()
        });
        options.playlist_items = Some("2-4".to_string());
        let args = options.to_args("https://youtu.be/abc");

        assert_eq!(args.first().map(String::as_str), Some("--no-playlist"));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
        assert_eq!(value_after(&args, "-f"), Some(options.format.as_str()));
        assert_eq!(value_after(&args, "--user-agent"), Some(USER_AGENT));
        assert_eq!(value_after(&args, "--sub-langs"), Some("en"));
        assert_eq!(value_after(&args, "--sub-format"), Some("srt"));
        assert_eq!(value_after(&args, "--merge-output-format"), Some("mp4"));
        assert_eq!(value_after(&args, "--playlist-items"), Some("2-4"));
        assert_eq!(value_after(&args, "--progress-template"), Some(PROGRESS_TEMPLATE));
        for flag in ["--no-check-certificates", "--quiet", "--no-warnings", "--write-subs", "--newline"] {
            assert!(args.iter().any(|a| a == flag), "missing {flag}");
        }
        assert!(!args.iter().any(|a| a == "-x"));
    }
}
