//! Progress events parsed from yt-dlp and their console rendering

use std::io::Write;

/// Prefix our `--progress-template` puts on every progress line
pub const PROGRESS_LINE_PREFIX: &str = "tubeloader|";

/// Progress snapshot reported by the engine
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DownloadProgress {
    pub status: DownloadStatus,
    /// Engine-formatted percentage, e.g. "42.5%"
    pub percent: Option<String>,
    pub downloaded_bytes: Option<u64>,
    /// Exact size, or the engine's estimate when the exact size is unknown
    pub total_bytes: Option<u64>,
    /// Engine-formatted rate, e.g. "1.20MiB/s"
    pub speed: Option<String>,
    /// Engine-formatted ETA, e.g. "00:15"
    pub eta: Option<String>,
}

impl DownloadProgress {
    pub fn finished() -> Self {
        Self {
            status: DownloadStatus::Finished,
            ..Default::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            status: DownloadStatus::Error,
            ..Default::default()
        }
    }

    /// Status line shown while downloading
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "Downloading... {}",
            self.percent.as_deref().unwrap_or("0%")
        );
        if let Some(total) = self.total_bytes {
            line.push_str(&format!(" of {}", format_bytes(total)));
        }
        if let Some(speed) = &self.speed {
            line.push_str(&format!(" at {}", speed));
        }
        if let Some(eta) = &self.eta {
            line.push_str(&format!(" ETA {}", eta));
        }
        line
    }
}

/// Download status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    #[default]
    Downloading,
    Finished,
    Error,
}

/// Parse one line of engine output into a progress event
///
/// Returns `None` for anything that is not one of our template lines.
pub fn parse_progress_line(line: &str) -> Option<DownloadProgress> {
    let rest = line.trim().strip_prefix(PROGRESS_LINE_PREFIX)?;
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    if fields.len() < 7 {
        return None;
    }

    let status = match fields[0] {
        "downloading" => DownloadStatus::Downloading,
        "finished" => DownloadStatus::Finished,
        "error" => DownloadStatus::Error,
        _ => return None,
    };

    Some(DownloadProgress {
        status,
        downloaded_bytes: parse_bytes(fields[1]),
        total_bytes: parse_bytes(fields[2]).or_else(|| parse_bytes(fields[3])),
        percent: text_field(fields[4]),
        speed: text_field(fields[5]),
        eta: text_field(fields[6]),
    })
}

// yt-dlp prints numbers as ints or floats and missing values as "NA" or "None"
fn parse_bytes(field: &str) -> Option<u64> {
    field
        .parse::<u64>()
        .ok()
        .or_else(|| field.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
}

fn text_field(field: &str) -> Option<String> {
    match field {
        "" | "NA" | "None" | "Unknown" => None,
        value => Some(value.to_string()),
    }
}

/// Converts bytes to a human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{}B", bytes)
    } else if bytes < MB {
        format!("{:.2}KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.2}MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.2}GB", bytes as f64 / GB as f64)
    }
}

/// Renders progress events to a terminal, rewriting the status line in place
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn handle(&mut self, progress: &DownloadProgress) {
        // Presentation only: a broken terminal must not abort the download
        let _ = match progress.status {
            DownloadStatus::Downloading => write!(self.out, "\r{}", progress.status_line()),
            DownloadStatus::Finished => writeln!(self.out, "\nDownload complete!"),
            DownloadStatus::Error => writeln!(self.out, "\nDownload failed!"),
        };
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
