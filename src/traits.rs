// Collaborator seam for error logging

use async_trait::async_trait;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// One appended error-log entry
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: OffsetDateTime,
    pub message: String,
}

impl ErrorRecord {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            message: message.into(),
        }
    }

    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.timestamp.unix_timestamp().to_string())
    }
}

/// Append-only sink for error events and spawn failures.
///
/// The orchestration core only produces the records; where and how they are
/// persisted is the consumer's concern.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    async fn record(&self, entry: ErrorRecord);
}

/// Default sink: timestamped lines on stderr.
pub struct StderrSink;

#[async_trait]
impl ErrorSink for StderrSink {
    async fn record(&self, entry: ErrorRecord) {
        eprintln!("[ErrorLog] {} {}", entry.timestamp_rfc3339(), entry.message);
    }
}

/// Sink that drops every record, for consumers doing their own capture.
pub struct NullSink;

#[async_trait]
impl ErrorSink for NullSink {
    async fn record(&self, _entry: ErrorRecord) {}
}
