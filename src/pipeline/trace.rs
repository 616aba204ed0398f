// Pipeline progress tracing
// Append-only JSONL trace file for monitoring a conversion run

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Conversion stages, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Calibrate,
    Coalesce,
    Emit,
    Write,
}

/// A single trace entry in the conversion log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// ISO 8601 timestamp of when this entry was created
    pub timestamp: String,

    pub stage: Stage,

    /// Progress percentage [0.0, 1.0]
    pub progress: f32,

    /// Human-readable message describing current operation
    pub message: String,

    /// Optional structured data (sample counts, output hash, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TraceEntry {
    /// Create a new trace entry with current timestamp
    pub fn new(stage: Stage, progress: f32, message: impl Into<String>) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured data to the entry
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Manages an append-only JSONL trace file
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    /// Append a trace entry to the file
    /// Creates file if it doesn't exist
    pub fn write(&self, entry: &TraceEntry) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let json_line = entry.to_json_line()?;
        file.write_all(json_line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Optional trace sink used by the pipeline
///
/// Tracing never fails a conversion: write errors are logged and dropped.
pub struct Tracer {
    writer: Option<TraceWriter>,
}

impl Tracer {
    pub fn disabled() -> Self {
        Tracer { writer: None }
    }

    pub fn to_file(path: PathBuf) -> Self {
        Tracer {
            writer: Some(TraceWriter::new(path)),
        }
    }

    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Tracer::to_file(path),
            None => Tracer::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    pub fn record(&self, entry: TraceEntry) {
        let Some(writer) = &self.writer else {
            return;
        };

        if let Err(e) = writer.write(&entry) {
            log::warn!(
                "Failed to write trace entry to {}: {}",
                writer.path().display(),
                e
            );
        }
    }

    /// Record a stage starting (progress = 0.0)
    pub fn start(&self, stage: Stage, message: impl Into<String>) {
        self.record(TraceEntry::new(stage, 0.0, message));
    }

    /// Record a finished stage (progress = 1.0) with its results
    pub fn complete(&self, stage: Stage, message: impl Into<String>, data: serde_json::Value) {
        self.record(TraceEntry::new(stage, 1.0, message).with_data(data));
    }
}

/// Read trace entries from a JSONL file
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: TraceEntry = serde_json::from_str(line)?;
        entries.push(entry);
    }

    Ok(entries)
}
