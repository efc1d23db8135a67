// Classification of downloader output lines into progress events

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::ProgressEvent;

lazy_static! {
    static ref PERCENT_RE: Regex = Regex::new(r"(\d+(?:\.\d+)?)%").unwrap();
    // "has already been downloaded" and the final summary line, e.g.
    // [download] 100% of 3.50MiB in 00:02
    static ref COMPLETED_RE: Regex =
        Regex::new(r"has already been downloaded|\[download\] 100(?:\.0)?% of .+ in ").unwrap();
}

/// Classify one output line. Total: never fails, exactly one event per line.
///
/// A transfer line like
/// `[download]   6.2% of ~ 343.72MiB at  420.30KiB/s ETA 12:32`
/// carries both a percentage and an ETA/rate marker; anything percent-shaped
/// without those markers is left to the later rules.
pub fn classify(line: &str) -> ProgressEvent {
    let trimmed = line.trim();

    if is_transfer_line(trimmed) {
        return ProgressEvent::Downloading {
            percent: parse_percent(trimmed),
            raw: line.to_string(),
        };
    }

    if COMPLETED_RE.is_match(trimmed) {
        return ProgressEvent::Completed;
    }

    if trimmed.starts_with("ERROR:") {
        return ProgressEvent::Error {
            text: trimmed.to_string(),
        };
    }

    ProgressEvent::Info {
        text: line.to_string(),
    }
}

fn is_transfer_line(line: &str) -> bool {
    line.contains('%') && (line.contains("ETA") || line.contains("/s"))
}

/// Best-effort percent extraction. An unparseable token leaves the raw line
/// to speak for itself rather than aborting the stream.
fn parse_percent(line: &str) -> Option<f32> {
    PERCENT_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok())
}
