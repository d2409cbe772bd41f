//! Link and output-directory checks used by the input collector

use regex::Regex;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Query marker that identifies a playlist link
pub const PLAYLIST_MARKER: &str = "list=";

/// Checks if the given string is a recognised YouTube link
///
/// Accepts video, shorts, music, watch, embed and playlist URLs, with or
/// without scheme and `www.`.
pub fn is_valid_youtube_link(url: &str) -> bool {
    lazy_static::lazy_static! {
        static ref YOUTUBE_PATTERNS: Vec<Regex> = [
            r"(?i)^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+(\?.*)?$",
            r"(?i)^(https?://)?(www\.)?youtube\.com/shorts/.+(\?.*)?$",
            r"(?i)^(https?://)?(music\.)?youtube\.com/.+(\?.*)?$",
            r"(?i)^(https?://)?(www\.)?youtube\.com/watch\?v=.+(&.*)?$",
            r"(?i)^(https?://)?(www\.)?youtube\.com/embed/.+(\?.*)?$",
            r"(?i)^(https?://)?(www\.)?youtube\.com/playlist\?list=.+$",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect();
    }

    let url = url.trim();
    YOUTUBE_PATTERNS.iter().any(|pattern| pattern.is_match(url))
}

/// True when the link points at a playlist
pub fn is_playlist_link(url: &str) -> bool {
    url.contains(PLAYLIST_MARKER)
}

/// True when `path` is an existing directory we can actually create files in
///
/// Mode bits alone miss read-only mounts and directories owned by someone
/// else, so this creates and removes a scratch file.
pub fn is_writable_dir(path: &Path) -> bool {
    static PROBE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    if !path.is_dir() {
        return false;
    }

    let scratch = path.join(format!(
        ".tubeloader-write-check-{}-{}",
        std::process::id(),
        PROBE_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    match OpenOptions::new().write(true).create_new(true).open(&scratch) {
        Ok(file) => {
            drop(file);
            let _ = std::fs::remove_file(&scratch);
            true
        }
        Err(_) => false,
    }
}
