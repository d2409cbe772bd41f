//! Interactive collection of a `DownloadRequest`

use crate::input::prompt::{Field, Prompter};
use crate::input::validation::{is_playlist_link, is_valid_youtube_link, is_writable_dir};
use crate::models::{Container, DownloadRequest, Quality};
use crate::utils::config::{Preset, DEFAULT_OUTPUT_DIR};
use crate::utils::error::TubeloaderError;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Where the quality/format/subtitle answers come from
#[derive(Debug, Clone, Copy)]
pub enum CollectMode<'a> {
    /// Ask for every field
    Interactive,
    /// Take quality, format and subtitles from a preset
    Template(&'a Preset),
}

/// Gather a fully validated request, or fail once any field runs out of attempts
pub fn collect_request<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    mode: CollectMode<'_>,
) -> Result<DownloadRequest, TubeloaderError> {
    let link = prompt_link(prompter)?;

    let default_dir = match mode {
        CollectMode::Template(preset) => preset.output_dir(),
        CollectMode::Interactive => PathBuf::from(DEFAULT_OUTPUT_DIR),
    };
    let output_dir = prompt_output_dir(prompter, default_dir)?;

    let (quality, container, download_subs) = match mode {
        CollectMode::Template(preset) => {
            info!(
                "Using preset values: quality={}, format={}, subtitles={}",
                preset.quality(),
                preset.container(),
                preset.download_subs()
            );
            (preset.quality(), preset.container(), preset.download_subs())
        }
        CollectMode::Interactive => (
            prompt_quality(prompter)?,
            prompt_container(prompter)?,
            prompter.confirm("subtitles", "Download subtitles? (y/n, default: n): ", false)?,
        ),
    };

    let is_playlist = is_playlist_link(&link);
    let playlist_items = if is_playlist {
        prompt_playlist_items(prompter)?
    } else {
        None
    };

    let request = DownloadRequest {
        link,
        output_dir,
        quality,
        container,
        is_playlist,
        download_subs,
        playlist_items,
    };
    info!("Collected request: {:?}", request);
    Ok(request)
}

fn prompt_link<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<String, TubeloaderError> {
    let field = Field::new(
        "link",
        "Enter the YouTube video/playlist URL: ",
        "Invalid YouTube URL. Please try again.",
    );
    prompter.prompt(&field, |answer| {
        is_valid_youtube_link(answer).then(|| answer.to_string())
    })
}

fn prompt_output_dir<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    default_dir: PathBuf,
) -> Result<PathBuf, TubeloaderError> {
    if let Err(e) = std::fs::create_dir_all(&default_dir) {
        warn!("Could not create default directory {:?}: {}", default_dir, e);
    }

    let default_text = default_dir.display().to_string();
    let field = Field::new(
        "output directory",
        format!("Enter the output directory (default: {}): ", default_text),
        "Invalid output directory or no write permissions. Please try again.",
    )
    .with_default(default_text);

    prompter.prompt(&field, |answer| {
        let path = PathBuf::from(answer);
        is_writable_dir(&path).then_some(path)
    })
}

fn prompt_quality<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Quality, TubeloaderError> {
    let field = Field::new(
        "quality",
        "Enter desired quality (best/high/medium/low, default: best): ",
        "Invalid quality. Choose from best, high, medium or low.",
    )
    .with_default(Quality::default().as_str());
    prompter.prompt(&field, |answer| answer.parse().ok())
}

fn prompt_container<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Container, TubeloaderError> {
    let field = Field::new(
        "format",
        "Enter desired format (mp4/webm/mp3, default: mp4): ",
        "Invalid format. Choose from mp4, webm or mp3.",
    )
    .with_default(Container::default().extension());
    prompter.prompt(&field, |answer| answer.parse().ok())
}

fn prompt_playlist_items<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<String>, TubeloaderError> {
    let restrict = prompter.confirm(
        "playlist selection",
        "Playlist detected. Download only specific items? (y/n, default: n): ",
        false,
    )?;
    if !restrict {
        return Ok(None);
    }

    // Forwarded to yt-dlp untouched; an empty answer means the whole playlist
    let items = prompter.ask("Enter item numbers or ranges (e.g. 1,3,5-7): ")?;
    Ok((!items.is_empty()).then_some(items))
}
