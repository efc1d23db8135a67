// Download orchestration core: resolves the external downloader/transcoder,
// builds per-format command lines, runs them with candidate fallback and
// streams classified progress back to the consumer.

pub mod command;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod runner;
pub mod tools;
pub mod traits;

pub use errors::DownloadError;
pub use models::{
    CommandSpec, DownloadRequest, DownloadResult, OutputFormat, ProcessOutcome, ProgressEvent,
};
pub use orchestrator::{Canceller, DownloadTask, Orchestrator, OrchestratorConfig};
pub use tools::{ToolInfo, ToolKind, ToolResolver, ToolSpec};
pub use traits::{ErrorRecord, ErrorSink, NullSink, StderrSink};
