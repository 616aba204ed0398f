// WebVTT serialization
// Renders cues to text and stores the track atomically on disk

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::timestamp::format_timestamp;
use super::types::{Cue, CueKind};

/// Fixed track header, including the blank line that ends it
pub const HEADER: &str = "WEBVTT\nKind: captions\nLanguage: en\n\n";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What ended up on disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: String,
    pub cues: usize,
}

/// Render the full track: header, then one block per cue
///
/// An event cue runs straight into its meter cue; every other cue is
/// closed with a blank line.
pub fn render_track(cues: &[Cue]) -> String {
    let mut out = String::from(HEADER);

    for cue in cues {
        if let Some(identifier) = &cue.identifier {
            out.push_str(identifier);
            out.push('\n');
        }

        out.push_str(&format_timestamp(cue.start_ms));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(cue.end_ms));
        if let Some(settings) = cue.settings() {
            out.push(' ');
            out.push_str(settings);
        }
        out.push('\n');

        out.push_str(&cue.text);
        out.push('\n');

        if cue.kind != CueKind::Event {
            out.push('\n');
        }
    }

    out
}

/// Render and store the track at `path`
///
/// The text goes to a temporary file beside the target first and is renamed
/// over it only once fully written; on failure the temporary file is removed
/// and any existing track is left untouched. A replaced track keeps its
/// permissions; a new one gets the same mode a plain file create would.
pub fn write_track(path: &Path, cues: &[Cue]) -> Result<WriteSummary, WriteError> {
    let rendered = render_track(cues);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let io_error = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = create_temp(dir).map_err(io_error)?;
    file.write_all(rendered.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    if let Ok(existing) = fs::metadata(path) {
        if existing.is_file() {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_error)?;
        }
    }
    file.persist(path).map_err(|e| io_error(e.error))?;

    let summary = WriteSummary {
        path: path.to_path_buf(),
        bytes: rendered.len(),
        sha256: calculate_sha256(rendered.as_bytes()),
        cues: cues.len(),
    };

    log::info!(
        "Wrote {} cues ({} bytes) to {}",
        summary.cues,
        summary.bytes,
        path.display()
    );

    Ok(summary)
}

// Temp files default to 0600; ask for 0666 so the umask decides, as with fs::write
#[cfg(unix)]
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// Calculate SHA256 hash of data
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
