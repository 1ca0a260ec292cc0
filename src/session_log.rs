//! Structured JSONL logger for session debugging and event reconstruction.
//!
//! Machine-parseable logging with monotonic sequence numbers, ISO 8601
//! timestamps with microsecond precision, and a session id for correlation.
//! Every engine command and every emitted engine event is written here, one
//! JSON object per line.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::engine::{EngineCommand, EngineEvent};

/// Structured JSONL logger for one tagging session.
pub struct SessionLogger {
    session_id: String,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number, unique across the session.
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds.
    pub ts: String,
    pub session_id: String,
    /// Component that emitted the entry.
    pub component: String,
    /// Structured event data.
    pub event: Value,
}

impl SessionLogger {
    /// Creates a logger writing to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs directory cannot be created or the log
    /// file cannot be opened.
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event. Serialization or write failures are
    /// swallowed: logging must never take down a tagging session.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    /// Logs an engine command as received, tagged with the apply sequence
    /// number so commands and their events correlate.
    pub fn log_command(&self, apply_seq: u64, command: &EngineCommand) {
        self.log(
            "Engine",
            serde_json::json!({
                "type": "Command",
                "apply_seq": apply_seq,
                "command": command,
            }),
        );
    }

    /// Logs an event emitted by the engine while applying a command.
    pub fn log_event(&self, apply_seq: u64, event: &EngineEvent) {
        self.log(
            "Engine",
            serde_json::json!({
                "type": "Event",
                "apply_seq": apply_seq,
                "event": event,
            }),
        );
    }
}
