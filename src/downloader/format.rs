//! yt-dlp format selector derivation

use crate::models::{Container, Quality};

/// Selector for audio-only downloads
pub const AUDIO_ONLY_SELECTOR: &str = "ba";

/// Selector for a quality tier with no container constraint
///
/// An unknown tier (`None`) behaves like `best`.
pub fn quality_selector(quality: Option<Quality>) -> String {
    match quality.and_then(Quality::max_height) {
        Some(height) => format!("bv[height<={}]+ba/b", height),
        None => "bv*+ba/b".to_string(),
    }
}

/// Full selector for a quality tier and container.
///
/// mp3 ignores the tier entirely. mp4/webm pin both the merged video stream
/// and the single-file fallback to that extension; no container leaves the
/// tier selector untouched.
///
/// The fallback keeps the height ceiling and the extension, so a video with
/// no matching single file fails rather than degrading to a plain `b`.
pub fn format_selector(quality: Option<Quality>, container: Option<Container>) -> String {
    let ext = match container {
        Some(Container::Mp3) => return AUDIO_ONLY_SELECTOR.to_string(),
        Some(container) => container.extension(),
        None => return quality_selector(quality),
    };

    match quality.and_then(Quality::max_height) {
        Some(height) => format!(
            "bv[height<={h}][ext={ext}]+ba/b[height<={h}][ext={ext}]",
            h = height,
            ext = ext
        ),
        None => format!("bv*[ext={ext}]+ba/b[ext={ext}]", ext = ext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_selectors() {
        assert_eq!(quality_selector(Some(Quality::Best)), "bv*+ba/b");
        assert_eq!(quality_selector(Some(Quality::High)), "bv[height<=720]+ba/b");
        assert_eq!(quality_selector(Some(Quality::Medium)), "bv[height<=480]+ba/b");
        assert_eq!(quality_selector(Some(Quality::Low)), "bv[height<=360]+ba/b");
    }

    #[test]
    fn test_unknown_quality_is_best() {
        let unknown = "ultra".parse::<Quality>().ok();
        assert_eq!(quality_selector(unknown), quality_selector(Some(Quality::Best)));
    }

    #[test]
    fn test_mp3_ignores_quality() {
        for quality in Quality::ALL {
            assert_eq!(format_selector(Some(quality), Some(Container::Mp3)), "ba");
        }
        assert_eq!(format_selector(None, Some(Container::Mp3)), "ba");
    }

    #[test]
    fn test_container_constrains_selector() {
        assert_eq!(
            format_selector(Some(Quality::Medium), Some(Container::Mp4)),
            "bv[height<=480][ext=mp4]+ba/b[height<=480][ext=mp4]"
        );
        assert_eq!(
            format_selector(Some(Quality::Best), Some(Container::Webm)),
            "bv*[ext=webm]+ba/b[ext=webm]"
        );
    }

    #[test]
    fn test_no_container_is_unconstrained() {
        for quality in Quality::ALL {
            assert_eq!(
                format_selector(Some(quality), None),
                quality_selector(Some(quality))
            );
        }
    }
}
