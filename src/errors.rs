// Error types for the download orchestration core

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// URL empty, malformed or not http(s); caught before any spawn
    InvalidRequest(String),

    /// Destination directory missing and could not be created
    InvalidDestination(String),

    /// Candidate binary could not be spawned
    ExecutableNotFound(String),

    /// Candidate ran but exited nonzero
    ProcessFailed { candidate: String, code: i32, detail: String },

    /// Every candidate was tried and none succeeded
    AllCandidatesExhausted { attempts: usize, last_error: String },

    /// Caller cancelled the in-flight download
    Cancelled,
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::InvalidDestination(msg) => write!(f, "Invalid destination: {}", msg),
            Self::ExecutableNotFound(msg) => write!(f, "Executable not found: {}", msg),
            Self::ProcessFailed { candidate, code, detail } => {
                if detail.is_empty() {
                    write!(f, "{} exited with status {}", candidate, code)
                } else {
                    write!(f, "{} exited with status {}: {}", candidate, code, detail)
                }
            }
            Self::AllCandidatesExhausted { attempts, last_error } => write!(
                f,
                "All {} candidate(s) failed. Last error: {}",
                attempts, last_error
            ),
            Self::Cancelled => write!(f, "Download cancelled by caller"),
        }
    }
}

impl std::error::Error for DownloadError {}

/// Pick the actionable part of captured process output for a failure summary.
///
/// Prefers explicit error lines over the raw tail, so the caller sees
/// "ERROR: HTTP Error 403: Forbidden" instead of a progress fragment.
pub fn summarize_lines(lines: &[String]) -> Option<String> {
    let important: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|s| {
            s.starts_with("ERROR:")
                || s.contains("HTTP Error")
                || s.contains("Forbidden")
                || s.contains("not available")
                || s.contains("Unsupported URL")
        })
        .take(2)
        .collect();

    if !important.is_empty() {
        return Some(important.join(" | "));
    }

    lines
        .iter()
        .rev()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .map(|l| l.chars().take(120).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_summary_prefers_error_lines() {
        let captured = lines(&[
            "[youtube] abc: Downloading webpage",
            "ERROR: HTTP Error 403: Forbidden",
            "[download] Got error, retrying",
        ]);
        assert_eq!(
            summarize_lines(&captured).as_deref(),
            Some("ERROR: HTTP Error 403: Forbidden")
        );
    }

    #[test]
    fn test_summary_joins_at_most_two_error_lines() {
        let captured = lines(&[
            "ERROR: first",
            "ERROR: second",
            "ERROR: third",
        ]);
        assert_eq!(
            summarize_lines(&captured).as_deref(),
            Some("ERROR: first | ERROR: second")
        );
    }

    #[test]
    fn test_summary_falls_back_to_last_nonempty_line() {
        let captured = lines(&["[youtube] extracting", "something went wrong", "   "]);
        assert_eq!(
            summarize_lines(&captured).as_deref(),
            Some("something went wrong")
        );
    }

    #[test]
    fn test_summary_of_nothing_is_none() {
        assert_eq!(summarize_lines(&[]), None);
        assert_eq!(summarize_lines(&lines(&["", "  "])), None);
    }

    #[test]
    fn test_exhausted_display_carries_attempt_count() {
        let err = DownloadError::AllCandidatesExhausted {
            attempts: 2,
            last_error: "yt-dlp exited with status 1".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("All 2 candidate(s) failed"));
        assert!(text.contains("status 1"));
    }
}
