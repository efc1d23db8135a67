// Child process execution with live line streaming

use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::sync::mpsc;

use crate::models::{CommandSpec, ProcessOutcome, ProgressEvent};
use crate::progress;
use crate::traits::{ErrorRecord, ErrorSink};

/// Run one command to completion, forwarding every output line as a
/// classified event while it arrives. All spawn/IO failures end up inside
/// the returned outcome; nothing escapes as a panic or error.
pub async fn run(
    spec: &CommandSpec,
    events: &mpsc::Sender<ProgressEvent>,
    sink: &Arc<dyn ErrorSink>,
    cancel: &mut mpsc::Receiver<()>,
) -> ProcessOutcome {
    let mut child = match TokioCommand::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let message = format!("Failed to start {}: {}", spec.program, e);
            eprintln!("[Runner] {}", message);
            sink.record(ErrorRecord::now(message.clone())).await;
            return ProcessOutcome {
                spawn_error: Some(message),
                ..ProcessOutcome::default()
            };
        }
    };

    // Both pipes feed one channel so the caller sees a single line sequence
    // in arrival order.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(64);
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(forward_lines(stdout, line_tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(forward_lines(stderr, line_tx.clone())));
    }
    drop(line_tx);

    let mut outcome = ProcessOutcome::default();

    loop {
        tokio::select! {
            line = line_rx.recv() => {
                match line {
                    Some(line) => {
                        let event = progress::classify(&line);
                        if let ProgressEvent::Error { text } = &event {
                            sink.record(ErrorRecord::now(text.clone())).await;
                        }
                        outcome.captured_lines.push(line);
                        let _ = events.send(event).await;
                    }
                    // both pipes reached EOF
                    None => break,
                }
            }
            _ = cancel.recv() => {
                let _ = child.kill().await;
                outcome.cancelled = true;
                break;
            }
        }
    }

    if outcome.cancelled {
        // a grandchild can keep the pipes open past the kill; don't wait on EOF
        for reader in &readers {
            reader.abort();
        }
    }
    for reader in readers {
        let _ = reader.await;
    }

    match child.wait().await {
        Ok(status) => outcome.exit_code = status.code(),
        Err(e) => {
            if outcome.spawn_error.is_none() {
                outcome.spawn_error = Some(format!("Failed to wait for {}: {}", spec.program, e));
            }
        }
    }

    outcome
}

/// Read one pipe line by line. Lossy decoding: undecodable bytes are
/// replaced, never fatal to the stream.
async fn forward_lines<R: AsyncRead + Unpin>(pipe: R, tx: mpsc::Sender<String>) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(&['\r', '\n'][..])
                    .to_string();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
        }
    }
}
