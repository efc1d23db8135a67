// Download orchestration facade with candidate fallback

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

use crate::command;
use crate::errors::{self, DownloadError};
use crate::models::{DownloadRequest, DownloadResult, ProcessOutcome, ProgressEvent};
use crate::runner;
use crate::tools::{ToolInfo, ToolKind, ToolResolver, ToolSpec};
use crate::traits::{ErrorSink, StderrSink};

/// Construction-time settings.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Directory holding bundled copies of the external tools, used as the
    /// fallback tier behind a system-wide install.
    pub bundled_tools_dir: Option<PathBuf>,
}

impl OrchestratorConfig {
    pub fn with_bundled_tools_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bundled_tools_dir = Some(dir.into());
        self
    }
}

/// Facade over resolver, command builder and runner. Tool specs are resolved
/// once here and read-only afterwards; concurrent downloads share nothing
/// mutable.
pub struct Orchestrator {
    downloader: ToolSpec,
    transcoder: ToolSpec,
    sink: Arc<dyn ErrorSink>,
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        let resolver = ToolResolver::new(config.bundled_tools_dir);
        Self {
            downloader: resolver.resolve(ToolKind::Downloader),
            transcoder: resolver.resolve(ToolKind::Transcoder),
            sink: Arc::new(StderrSink),
        }
    }

    /// Bypass filesystem resolution with explicit candidate lists.
    pub fn with_tools(downloader: ToolSpec, transcoder: ToolSpec) -> Self {
        Self {
            downloader,
            transcoder,
            sink: Arc::new(StderrSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Detected state of both tools, for the consumer to surface before a
    /// download is attempted.
    pub fn tool_status(&self) -> Vec<ToolInfo> {
        vec![self.downloader.status(), self.transcoder.status()]
    }

    /// Start one download. Validation happens here, before any spawn; the
    /// actual work runs on its own task so the caller is never blocked.
    pub fn download(&self, request: DownloadRequest) -> Result<DownloadTask, DownloadError> {
        validate_request(&request)?;
        command::ensure_destination(&request.destination_dir)?;

        let (event_tx, event_rx) = mpsc::channel(64);
        let (cancel_tx, cancel_rx) = mpsc::channel(1);

        let downloader = self.downloader.clone();
        let transcoder_path = self.transcoder.preferred().to_string();
        let sink = Arc::clone(&self.sink);

        let handle = tokio::spawn(run_attempts(
            downloader,
            transcoder_path,
            request,
            event_tx,
            sink,
            cancel_rx,
        ));

        Ok(DownloadTask {
            events: event_rx,
            cancel: Canceller { tx: cancel_tx },
            handle,
        })
    }
}

/// Handle to one in-flight download: live events, cancellation, final result.
pub struct DownloadTask {
    events: mpsc::Receiver<ProgressEvent>,
    cancel: Canceller,
    handle: JoinHandle<DownloadResult>,
}

impl DownloadTask {
    /// Next event in production order; `None` once the run is over.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    pub fn canceller(&self) -> Canceller {
        self.cancel.clone()
    }

    /// Drain remaining events and wait for the terminal result.
    pub async fn wait(mut self) -> DownloadResult {
        while self.events.recv().await.is_some() {}
        match self.handle.await {
            Ok(result) => result,
            Err(e) => DownloadResult::failure(format!("download task failed: {}", e), 0),
        }
    }
}

/// Cloneable cancellation handle. Safe to fire from any task; a second
/// cancel is a no-op.
#[derive(Clone)]
pub struct Canceller {
    tx: mpsc::Sender<()>,
}

impl Canceller {
    pub fn cancel(&self) {
        let _ = self.tx.try_send(());
    }
}

fn validate_request(request: &DownloadRequest) -> Result<(), DownloadError> {
    let raw = request.url.trim();
    if raw.is_empty() {
        return Err(DownloadError::InvalidRequest("URL is empty".to_string()));
    }
    match Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(DownloadError::InvalidRequest(format!(
            "unsupported scheme '{}'",
            parsed.scheme()
        ))),
        Err(e) => Err(DownloadError::InvalidRequest(format!("malformed URL: {}", e))),
    }
}

/// Candidate loop: first success wins, failures advance to the next
/// candidate, cancellation short-circuits. Candidates run strictly one at a
/// time so two attempts can never write the same destination file.
async fn run_attempts(
    downloader: ToolSpec,
    transcoder_path: String,
    request: DownloadRequest,
    events: mpsc::Sender<ProgressEvent>,
    sink: Arc<dyn ErrorSink>,
    mut cancel: mpsc::Receiver<()>,
) -> DownloadResult {
    let total = downloader.candidates.len();
    let mut attempts = 0;
    let mut last_failure = String::new();

    for (idx, candidate) in downloader.candidates.iter().enumerate() {
        // a cancel that landed between candidates still wins
        if cancel.try_recv().is_ok() {
            return DownloadResult::cancelled_after(attempts);
        }

        attempts += 1;
        eprintln!(
            "[Orchestrator] Trying candidate {}/{}: {}",
            idx + 1,
            total,
            candidate
        );
        let _ = events
            .send(ProgressEvent::Info {
                text: format!("Trying {} ({}/{})", candidate, idx + 1, total),
            })
            .await;

        let spec = command::build(&request, candidate, &transcoder_path);
        let outcome = runner::run(&spec, &events, &sink, &mut cancel).await;

        if outcome.cancelled {
            eprintln!("[Orchestrator] Cancelled while running {}", candidate);
            return DownloadResult::cancelled_after(attempts);
        }

        if outcome.succeeded() {
            eprintln!("[Orchestrator] ✓ Success with {}", candidate);
            return DownloadResult::success(attempts);
        }

        last_failure = describe_failure(candidate, &outcome);
        eprintln!("[Orchestrator] ✗ {} failed: {}", candidate, last_failure);
    }

    let exhausted = DownloadError::AllCandidatesExhausted {
        attempts,
        last_error: last_failure,
    };
    DownloadResult::failure(exhausted.to_string(), attempts)
}

fn describe_failure(candidate: &str, outcome: &ProcessOutcome) -> String {
    if let Some(spawn_error) = &outcome.spawn_error {
        return DownloadError::ExecutableNotFound(spawn_error.clone()).to_string();
    }
    match outcome.exit_code {
        Some(code) => DownloadError::ProcessFailed {
            candidate: candidate.to_string(),
            code,
            detail: errors::summarize_lines(&outcome.captured_lines).unwrap_or_default(),
        }
        .to_string(),
        None => format!("{} terminated by signal", candidate),
    }
}
