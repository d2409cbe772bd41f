//! yt-dlp process backend
//!
//! Runs yt-dlp as a child process, turns its progress lines into
//! `DownloadProgress` events and its `ERROR:` output into typed errors.
//! Either a standalone yt-dlp binary or the `yt_dlp` Python module can be used.

use crate::downloader::options::EngineOptions;
use crate::downloader::progress::{parse_progress_line, DownloadProgress, DownloadStatus};
use crate::downloader::traits::{DownloadBackend, ProgressHook};
use crate::utils::error::TubeloaderError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

/// Interpreter used for the `python -m yt_dlp` fallback
const PYTHON: &str = "python3";

/// yt-dlp reached as a child process
#[derive(Debug, Clone)]
pub struct YtDlpBackend {
    program: PathBuf,
    /// Arguments placed before the option set (e.g. `-m yt_dlp`)
    leading_args: Vec<String>,
}

impl YtDlpBackend {
    /// Locate yt-dlp and verify it is usable
    ///
    /// Search order:
    /// 1. Next to the current executable
    /// 2. System PATH
    /// 3. Common installation paths
    /// 4. `python3 -m yt_dlp`
    pub fn detect() -> Result<Self, TubeloaderError> {
        if let Some(path) = find_ytdlp() {
            info!("Found yt-dlp at: {}", path.display());
            return Ok(Self::with_path(path));
        }

        if python_has_ytdlp() {
            info!("Using yt-dlp through `{} -m yt_dlp`", PYTHON);
            return Ok(Self::with_command(
                PYTHON,
                vec!["-m".to_string(), "yt_dlp".to_string()],
            ));
        }

        error!("yt-dlp not found anywhere!");
        Err(TubeloaderError::YtDlpNotFound)
    }

    /// Use an explicit yt-dlp executable
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::with_command(path, Vec::new())
    }

    /// Use `program leading_args... <options> <url>`
    pub fn with_command(program: impl Into<PathBuf>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument list for one invocation
    pub fn command_args(&self, url: &str, options: &EngineOptions) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend(options.to_args(url));
        args
    }
}

#[async_trait]
impl DownloadBackend for YtDlpBackend {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(
        &self,
        url: &str,
        options: &EngineOptions,
        progress: &mut ProgressHook<'_>,
    ) -> Result<(), TubeloaderError> {
        let args = self.command_args(url, options);
        debug!("Spawning {:?} with args {:?}", self.program, args);

        let mut child = AsyncCommand::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TubeloaderError::YtDlpNotFound,
                _ => TubeloaderError::Unexpected(format!("Failed to start yt-dlp: {}", e)),
            })?;

        // Drain stderr concurrently so the child never blocks on a full pipe
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TubeloaderError::Unexpected("yt-dlp stderr was not captured".into()))?;
        let stderr_reader = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut collected = Vec::new();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("yt-dlp stderr: {}", line);
                collected.push(line);
            }
            collected
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TubeloaderError::Unexpected("yt-dlp stdout was not captured".into()))?;
        let mut lines = BufReader::new(stdout).lines();
        let mut reported_error = false;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| TubeloaderError::Unexpected(format!("Failed to read yt-dlp output: {}", e)))?
        {
            match parse_progress_line(&line) {
                Some(event) => {
                    if event.status == DownloadStatus::Error {
                        reported_error = true;
                    }
                    progress(&event);
                }
                None => debug!("yt-dlp: {}", line),
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| TubeloaderError::Unexpected(format!("Failed to wait for yt-dlp: {}", e)))?;
        let stderr_lines = match stderr_reader.await {
            Ok(lines) => lines,
            Err(e) => {
                warn!("stderr reader task failed: {}", e);
                Vec::new()
            }
        };

        if status.success() {
            info!("yt-dlp finished successfully for {}", url);
            return Ok(());
        }

        if !reported_error {
            progress(&DownloadProgress::failed());
        }
        Err(classify_failure(&stderr_lines, status.code()))
    }
}

const FILESYSTEM_MARKERS: &[&str] = &[
    "permission denied",
    "no such file or directory",
    "unable to open for writing",
    "unable to create directory",
    "no space left on device",
    "read-only file system",
];

const NETWORK_MARKERS: &[&str] = &[
    "urlopen error",
    "timed out",
    "connection refused",
    "connection reset",
    "connection aborted",
    "network is unreachable",
    "name resolution",
    "name or service not known",
    "getaddrinfo failed",
    "http error 429",
    "http error 5",
];

const PLAYLIST_MARKERS: &[&str] = &["playlist"];

/// Map yt-dlp's error output and exit status to an error category
pub fn classify_failure(stderr_lines: &[String], exit_code: Option<i32>) -> TubeloaderError {
    let message = stderr_lines.iter().rev().find_map(|line| {
        let line = line.trim();
        line.strip_prefix("ERROR:")
            .or_else(|| line.strip_prefix("yt-dlp: error:"))
            .map(str::trim)
    });

    let Some(message) = message else {
        let status = exit_code
            .map(|code| format!("yt-dlp exited with status {}", code))
            .unwrap_or_else(|| "yt-dlp was terminated by a signal".to_string());
        let detail = stderr_lines
            .iter()
            .rev()
            .map(|line| line.trim())
            .find(|line| !line.is_empty());
        return TubeloaderError::Unexpected(match detail {
            Some(detail) => format!("{}: {}", status, detail),
            None => status,
        });
    };

    let lower = message.to_lowercase();
    let has_any = |markers: &[&str]| markers.iter().any(|marker| lower.contains(marker));
    let message = message.to_string();

    if has_any(FILESYSTEM_MARKERS) {
        TubeloaderError::Filesystem(message)
    } else if has_any(NETWORK_MARKERS) {
        TubeloaderError::Network(message)
    } else if has_any(PLAYLIST_MARKERS) {
        TubeloaderError::Playlist(message)
    } else {
        TubeloaderError::Download(message)
    }
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find the yt-dlp binary with priority:
/// 1. Next to the current executable
/// 2. System PATH
/// 3. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(local) = find_beside_executable() {
        info!("✓ Using yt-dlp next to the executable: {:?}", local);
        return Some(local);
    }

    if let Some(system) = find_in_path() {
        info!("✓ Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("✓ Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("✗ yt-dlp binary not found");
    None
}

fn binary_name() -> String {
    format!("yt-dlp{}", std::env::consts::EXE_SUFFIX)
}

fn find_beside_executable() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let candidate = exe_path.parent()?.join(binary_name());
    debug!("Checking for yt-dlp beside executable: {:?}", candidate);
    is_executable(&candidate).then_some(candidate)
}

fn find_in_path() -> Option<PathBuf> {
    which::which("yt-dlp").ok().filter(|path| path.exists())
}

fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        // System
        "/usr/bin/yt-dlp",
        // pip --user / pipx
        "~/.local/bin/yt-dlp",
    ];

    common_paths
        .iter()
        .map(|path_str| expand_home(path_str))
        .find(|path| is_executable(path))
}

fn expand_home(path_str: &str) -> PathBuf {
    match (path_str.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path_str),
    }
}

fn python_has_ytdlp() -> bool {
    Command::new(PYTHON)
        .args(["-m", "yt_dlp", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
