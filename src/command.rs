// Argument construction for the downloader tool

use std::path::Path;

use crate::errors::DownloadError;
use crate::models::{CommandSpec, DownloadRequest, OutputFormat};

/// Make sure the destination directory exists before a command is built.
/// The filename itself stays with the invoked tool via the output template.
pub fn ensure_destination(dir: &Path) -> Result<(), DownloadError> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
        .map_err(|e| DownloadError::InvalidDestination(format!("{}: {}", dir.display(), e)))
}

/// Build the full argument vector for one attempt. Pure: identical inputs
/// always produce the identical command line.
pub fn build(request: &DownloadRequest, tool_path: &str, transcoder_path: &str) -> CommandSpec {
    let mut args: Vec<String> = match request.format {
        OutputFormat::AudioOnly => vec![
            "-f".to_string(),
            "ba/b".to_string(),
            "-x".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "0".to_string(),
        ],
        OutputFormat::VideoContainer => vec![
            "-f".to_string(),
            "bv*+ba/b".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
        ],
    };

    args.extend([
        "--ffmpeg-location".to_string(),
        transcoder_path.to_string(),
        "--newline".to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "-P".to_string(),
        request.destination_dir.to_string_lossy().into_owned(),
        // Default yt-dlp template is "%(title)s [%(id)s].%(ext)s" — override to remove [id]
        "-o".to_string(),
        "%(title)s.%(ext)s".to_string(),
        request.url.clone(),
    ]);

    CommandSpec {
        program: tool_path.to_string(),
        args,
    }
}
