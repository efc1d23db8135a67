// Common data models for the download orchestration core

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target output produced by a download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Audio track extracted and transcoded to mp3
    AudioOnly,
    /// Best video+audio pair merged into an mp4 container
    VideoContainer,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::AudioOnly => "mp3",
            OutputFormat::VideoContainer => "mp4",
        }
    }
}

/// One user-submitted download. Created per submission, discarded after the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: OutputFormat,
    pub destination_dir: PathBuf,
}

impl DownloadRequest {
    /// Request targeting the platform download directory.
    pub fn new(url: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            url: url.into(),
            format,
            destination_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn with_destination(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_dir = dir.into();
        self
    }
}

/// Fully resolved command line for one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// Termination record of one spawned process
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    pub exit_code: Option<i32>,
    pub spawn_error: Option<String>,
    pub captured_lines: Vec<String>,
    pub cancelled: bool,
}

impl ProcessOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Progress event streamed to the consumer while a download runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressEvent {
    Info { text: String },
    Downloading { percent: Option<f32>, raw: String },
    Error { text: String },
    Completed,
}

/// Terminal result of one download call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub succeeded: bool,
    pub cancelled: bool,
    pub final_message: String,
    pub attempts_tried: usize,
}

impl DownloadResult {
    pub fn success(attempts_tried: usize) -> Self {
        Self {
            succeeded: true,
            cancelled: false,
            final_message: "Download completed successfully".to_string(),
            attempts_tried,
        }
    }

    pub fn failure(final_message: impl Into<String>, attempts_tried: usize) -> Self {
        Self {
            succeeded: false,
            cancelled: false,
            final_message: final_message.into(),
            attempts_tried,
        }
    }

    pub fn cancelled_after(attempts_tried: usize) -> Self {
        Self {
            succeeded: false,
            cancelled: true,
            final_message: crate::errors::DownloadError::Cancelled.to_string(),
            attempts_tried,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels() {
        assert_eq!(OutputFormat::AudioOnly.as_str(), "mp3");
        assert_eq!(OutputFormat::VideoContainer.as_str(), "mp4");
    }

    #[test]
    fn test_request_destination_override() {
        let request = DownloadRequest::new("https://example.com/v", OutputFormat::AudioOnly)
            .with_destination("/tmp/media");
        assert_eq!(request.destination_dir, PathBuf::from("/tmp/media"));
    }

    #[test]
    fn test_outcome_success_requires_zero_exit() {
        let mut outcome = ProcessOutcome::default();
        assert!(!outcome.succeeded());
        outcome.exit_code = Some(1);
        assert!(!outcome.succeeded());
        outcome.exit_code = Some(0);
        assert!(outcome.succeeded());
    }

    #[test]
    fn test_events_cross_the_ui_boundary_as_json() {
        let event = ProgressEvent::Downloading {
            percent: Some(42.0),
            raw: "[download]  42.0% of 10.00MiB at 1.00MiB/s ETA 00:05".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_cancelled_result_is_not_a_failure_message() {
        let result = DownloadResult::cancelled_after(1);
        assert!(!result.succeeded);
        assert!(result.cancelled);
        assert_eq!(result.attempts_tried, 1);
    }
}
