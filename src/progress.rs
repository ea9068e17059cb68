//! Ingestion progress reporting.
//!
//! Reports observable progress during `raginfo add` so users see which file
//! is being processed and how many are left. Progress is emitted on
//! **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event during batch ingestion.
#[derive(Clone, Debug)]
pub enum IngestEvent {
    /// One source was extracted, chunked, and persisted: n files done out
    /// of total.
    Ingested { name: String, n: u64, total: u64 },
    /// One source failed; the batch continues with the remaining files.
    Failed {
        name: String,
        error: String,
        n: u64,
        total: u64,
    },
}

/// Reports ingestion progress. Implementations write to stderr (human or
/// JSON).
pub trait IngestProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the ingestion loop.
    fn report(&self, event: IngestEvent);
}

/// Human-friendly progress on stderr: "add notes.txt  2 / 14 files".
pub struct StderrProgress;

impl IngestProgressReporter for StderrProgress {
    fn report(&self, event: IngestEvent) {
        let line = match &event {
            IngestEvent::Ingested { name, n, total } => {
                format!(
                    "add {}  {} / {} files\n",
                    name,
                    format_number(*n),
                    format_number(*total)
                )
            }
            IngestEvent::Failed {
                name,
                error,
                n,
                total,
            } => {
                format!(
                    "add {}  FAILED ({})  {} / {} files\n",
                    name,
                    error,
                    format_number(*n),
                    format_number(*total)
                )
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl IngestProgressReporter for JsonProgress {
    fn report(&self, event: IngestEvent) {
        let obj = match &event {
            IngestEvent::Ingested { name, n, total } => serde_json::json!({
                "event": "progress",
                "file": name,
                "status": "ingested",
                "n": n,
                "total": total
            }),
            IngestEvent::Failed {
                name,
                error,
                n,
                total,
            } => serde_json::json!({
                "event": "progress",
                "file": name,
                "status": "failed",
                "error": error,
                "n": n,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl IngestProgressReporter for NoProgress {
    fn report(&self, _event: IngestEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode. Caller can pass it to the ingestion
    /// loop.
    pub fn reporter(&self) -> Box<dyn IngestProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
