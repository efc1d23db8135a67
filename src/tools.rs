// External tool resolution: candidate paths for the downloader and transcoder

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Downloader,
    Transcoder,
}

impl ToolKind {
    pub fn command_name(&self) -> &'static str {
        match self {
            ToolKind::Downloader => "yt-dlp",
            ToolKind::Transcoder => "ffmpeg",
        }
    }

    fn version_arg(&self) -> &'static str {
        match self {
            ToolKind::Downloader => "--version",
            ToolKind::Transcoder => "-version", // ffmpeg uses a single dash
        }
    }
}

/// Ordered candidate commands for one logical tool. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub kind: ToolKind,
    pub candidates: Vec<String>,
}

impl ToolSpec {
    /// Spec with an explicit candidate list. The bare command name is kept
    /// as a last resort so the list is never empty.
    pub fn custom(kind: ToolKind, candidates: Vec<String>) -> Self {
        let mut candidates = candidates;
        if candidates.is_empty() {
            candidates.push(kind.command_name().to_string());
        }
        Self { kind, candidates }
    }

    /// First candidate present on disk, else the final fallback entry.
    /// Used when the tool is referenced as an argument rather than spawned,
    /// so a bare name still lets the invoked tool do its own PATH lookup.
    pub fn preferred(&self) -> &str {
        for candidate in &self.candidates {
            if std::path::Path::new(candidate).exists() {
                return candidate;
            }
        }
        self.candidates
            .last()
            .map(String::as_str)
            .unwrap_or_else(|| self.kind.command_name())
    }

    /// Probe candidates in order and report the first one that answers its
    /// version flag.
    pub fn status(&self) -> ToolInfo {
        for candidate in &self.candidates {
            if let Some(version) = probe_version(candidate, self.kind) {
                return ToolInfo {
                    name: self.kind.command_name().to_string(),
                    kind: self.kind,
                    path: Some(candidate.clone()),
                    version: Some(version),
                    is_available: true,
                };
            }
        }

        ToolInfo {
            name: self.kind.command_name().to_string(),
            kind: self.kind,
            path: None,
            version: None,
            is_available: false,
        }
    }
}

/// Detected state of one tool, for surfacing in the consumer's UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub kind: ToolKind,
    pub path: Option<String>,
    pub version: Option<String>,
    pub is_available: bool,
}

/// Builds candidate lists from configuration.
///
/// Ordering: a system-installed binary first, then the bundled copy from
/// configuration, then the bare command name. Resolution itself never fails;
/// a candidate that does not actually exist surfaces as a spawn failure at
/// execution time.
#[derive(Debug, Clone, Default)]
pub struct ToolResolver {
    bundled_dir: Option<PathBuf>,
}

impl ToolResolver {
    pub fn new(bundled_dir: Option<PathBuf>) -> Self {
        Self { bundled_dir }
    }

    pub fn resolve(&self, kind: ToolKind) -> ToolSpec {
        let name = kind.command_name();
        let mut candidates = Vec::new();

        if let Some(path) = find_system(name) {
            candidates.push(path);
        }

        // The bundled copy is listed without re-verification; whether it is
        // actually runnable is decided when it is spawned.
        if let Some(dir) = &self.bundled_dir {
            candidates.push(dir.join(name).to_string_lossy().into_owned());
        }

        if !candidates.iter().any(|c| c == name) {
            candidates.push(name.to_string());
        }

        ToolSpec { kind, candidates }
    }
}

/// Look for a system-wide install: well-known locations first, then PATH.
fn find_system(binary_name: &str) -> Option<String> {
    let common_paths = [
        format!("/opt/homebrew/bin/{}", binary_name),
        format!("/usr/local/bin/{}", binary_name),
        format!("/usr/bin/{}", binary_name),
    ];

    for path in common_paths {
        if std::path::Path::new(&path).exists() {
            return Some(path);
        }
    }

    if let Ok(output) = Command::new("which").arg(binary_name).output() {
        if output.status.success() {
            let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path.is_empty() {
                return Some(path);
            }
        }
    }

    None
}

fn probe_version(path: &str, kind: ToolKind) -> Option<String> {
    match Command::new(path).arg(kind.version_arg()).output() {
        Ok(output) if output.status.success() => {
            // ffmpeg prints a banner; the first line carries the version
            let out = String::from_utf8_lossy(&output.stdout);
            out.lines().next().map(|l| l.trim().to_string())
        }
        _ => None,
    }
}
