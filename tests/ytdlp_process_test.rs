//! yt-dlp backend driven against small shell scripts standing in for the real binary.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tubeloader::downloader::{
    build_options, DownloadBackend, DownloadProgress, DownloadStatus, YtDlpBackend,
};
use tubeloader::{Container, DownloadRequest, Quality, TubeloaderError};

/// Write `body` as a shell script and return a backend that runs it through `sh`
fn fake_ytdlp(dir: &TempDir, body: &str) -> YtDlpBackend {
    let script = dir.path().join("yt-dlp.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    YtDlpBackend::with_command("sh", vec![script.to_string_lossy().into_owned()])
}

fn request(output_dir: &Path) -> DownloadRequest {
    DownloadRequest {
        link: "https://www.youtube.com/watch?v=abc123".into(),
        output_dir: output_dir.to_path_buf(),
        quality: Quality::Medium,
        container: Container::Mp4,
        is_playlist: false,
        download_subs: false,
        playlist_items: None,
    }
}

async fn run(
    backend: &YtDlpBackend,
    request: &DownloadRequest,
) -> (Result<(), TubeloaderError>, Vec<DownloadProgress>) {
    let options = build_options(request);
    let mut events = Vec::new();
    let mut hook = |p: &DownloadProgress| events.push(p.clone());
    let result = backend.download(&request.link, &options, &mut hook).await;
    (result, events)
}

#[tokio::test]
async fn progress_lines_become_events() {
    let temp = tempdir().unwrap();
    let backend = fake_ytdlp(
        &temp,
        r#"echo "[youtube] abc123: Downloading webpage"
echo "tubeloader|downloading|1048576|10485760|NA| 10.0%|1.00MiB/s|00:09"
echo "tubeloader|downloading|5242880|NA|10485760| 50.0%|1.00MiB/s|00:05"
echo "tubeloader|finished|10485760|10485760|NA|100.0%|NA|NA"
exit 0"#,
    );

    let (result, events) = run(&backend, &request(temp.path())).await;
    result.expect("fake download succeeds");

    assert_eq!(events.len(), 3, "non-template lines are ignored");
    assert_eq!(events[0].status, DownloadStatus::Downloading);
    assert_eq!(events[0].downloaded_bytes, Some(1_048_576));
    assert_eq!(events[0].percent.as_deref(), Some("10.0%"));
    assert_eq!(events[1].total_bytes, Some(10_485_760), "estimate fills a missing total");
    assert_eq!(events[2].status, DownloadStatus::Finished);
}

#[tokio::test]
async fn receives_the_built_arguments() {
    let temp = tempdir().unwrap();
    let args_file: PathBuf = temp.path().join("args.txt");
    let backend = fake_ytdlp(
        &temp,
        &format!(r#"for a in "$@"; do echo "$a"; done > '{}'"#, args_file.display()),
    );

    let mut req = request(temp.path());
    req.is_playlist = true;
    req.playlist_items = Some("1,3,5-7".into());
    let (result, _) = run(&backend, &req).await;
    result.expect("fake download succeeds");

    let args: Vec<String> = std::fs::read_to_string(&args_file)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(args.last().map(String::as_str), Some(req.link.as_str()));
    assert!(args.iter().any(|a| a == "--yes-playlist"));
    let pos = args.iter().position(|a| a == "--playlist-items").unwrap();
    assert_eq!(args[pos + 1], "1,3,5-7");
    let pos = args.iter().position(|a| a == "-f").unwrap();
    assert!(args[pos + 1].contains("[height<=480]"));
}

#[tokio::test]
async fn network_failure_is_classified() {
    let temp = tempdir().unwrap();
    let backend = fake_ytdlp(
        &temp,
        r#"echo "ERROR: [youtube] abc123: Unable to download API page: <urlopen error [Errno -3] Temporary failure in name resolution>" >&2
exit 1"#,
    );

    let (result, events) = run(&backend, &request(temp.path())).await;
    let err = result.unwrap_err();
    assert!(matches!(err, TubeloaderError::Network(_)), "{err:?}");
    assert_eq!(events.last().map(|e| e.status), Some(DownloadStatus::Error));
}

#[tokio::test]
async fn unavailable_video_is_a_download_error() {
    let temp = tempdir().unwrap();
    let backend = fake_ytdlp(
        &temp,
        r#"echo "WARNING: something harmless" >&2
echo "ERROR: [youtube] abc123: Video unavailable" >&2
exit 1"#,
    );

    let (result, _) = run(&backend, &request(temp.path())).await;
    match result {
        Err(TubeloaderError::Download(msg)) => assert!(msg.contains("Video unavailable")),
        other => panic!("expected download error, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_without_error_line_is_unexpected() {
    let temp = tempdir().unwrap();
    let backend = fake_ytdlp(&temp, "echo 'Traceback (most recent call last):' >&2\nexit 3");

    let (result, _) = run(&backend, &request(temp.path())).await;
    match result {
        Err(TubeloaderError::Unexpected(msg)) => {
            assert!(msg.contains("status 3"), "{msg}");
            assert!(msg.contains("Traceback"), "{msg}");
        }
        other => panic!("expected unexpected error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_program_is_not_found() {
    let temp = tempdir().unwrap();
    let backend = YtDlpBackend::with_path(temp.path().join("definitely-not-yt-dlp"));

    let (result, events) = run(&backend, &request(temp.path())).await;
    assert!(matches!(result, Err(TubeloaderError::YtDlpNotFound)));
    assert!(events.is_empty());
}
