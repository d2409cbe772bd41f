//! Tubeloader - interactive YouTube downloader
//!
//! Asks for a link, an output directory and format preferences, then hands
//! the download to yt-dlp.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tubeloader::downloader::{download_video, ConsoleProgress, DownloadProgress, YtDlpBackend};
use tubeloader::input::{collect_request, CollectMode, Prompter, DEFAULT_MAX_ATTEMPTS};
use tubeloader::utils::config::DEFAULT_CONFIG_FILE;
use tubeloader::utils::logging::DEFAULT_LOG_FILE;
use tubeloader::utils::{init_file_logging, load_config, select_template};
use tubeloader::TubeloaderError;

#[derive(Parser)]
#[command(version, about = "Interactive YouTube downloader built on yt-dlp")]
struct Args {
    /// Preset file, created with a default preset when missing
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Append log lines to this file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Path to the yt-dlp executable (auto-detected when omitted)
    #[arg(long = "yt-dlp", value_name = "PATH")]
    yt_dlp: Option<PathBuf>,

    /// Invalid answers allowed per prompt before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: usize,

    /// Ask for quality, format and subtitles instead of using a preset
    #[arg(long)]
    interactive: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_file_logging(&args.log_file) {
        eprintln!("Warning: {:#}", e);
    }

    match run(args) {
        Ok(()) => {
            println!("Download complete! Check your output directory.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<TubeloaderError>() {
                Some(err) => {
                    // Download failures are already logged by the orchestrator
                    if !err.is_download_failure() {
                        error!("{}", err);
                    }
                    eprintln!("{}", err.user_message());
                }
                None => {
                    error!("{:#}", e);
                    eprintln!("Error: {:#}", e);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    info!("Starting tubeloader");

    let backend = match args.yt_dlp {
        Some(path) => YtDlpBackend::with_path(path),
        None => YtDlpBackend::detect()?,
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::with_max_attempts(stdin.lock(), io::stdout(), args.max_attempts);

    let document = if args.interactive {
        None
    } else {
        Some(load_config(&args.config)?)
    };
    let mode = match &document {
        Some(document) => {
            let (_, preset) = select_template(document, &mut prompter)?;
            CollectMode::Template(preset)
        }
        None => CollectMode::Interactive,
    };

    let request = collect_request(&mut prompter, mode)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let mut console = ConsoleProgress::new(io::stdout());
    let mut report = |progress: &DownloadProgress| console.handle(progress);
    runtime.block_on(download_video(&backend, &request, &mut report))?;

    Ok(())
}
