// Conversion pipeline
// Reader -> Calibrator -> Coalescer -> Cue Emitter -> Writer

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::trace::{Stage, Tracer};
use crate::captions::{write_track, Cue, CueEmitter, WriteError, WriteSummary};
use crate::config::{CaptionConfig, ConfigError};
use crate::ingest::{read_samples_from_path, IngestError, ReaderOptions, Sample};
use crate::signal::{calibrate, coalesce, MeterScale, ScaleError, SignalRange};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Everything a file-to-file conversion needs
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub reader: ReaderOptions,
    pub captions: CaptionConfig,

    /// JSONL trace destination; tracing is off when None
    pub trace_path: Option<PathBuf>,
}

/// Cues for one recording plus the scaling that produced them
#[derive(Debug, Clone)]
pub struct Track {
    pub range: SignalRange,
    pub scale: MeterScale,
    pub intervals: usize,
    pub cues: Vec<Cue>,
}

/// Summary of a finished file conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub samples: usize,
    pub max_pressure: f64,
    pub scale_min: f64,
    pub intervals: usize,
    pub output: WriteSummary,
}

/// Build the cue track for samples already in memory
pub fn convert_samples(samples: &[Sample], config: &CaptionConfig) -> Result<Track, ConvertError> {
    config.validate()?;
    build_track(samples, config, &Tracer::disabled())
}

/// Read a sensor log, build its cue track, and store it at `output`
///
/// The configuration is checked before the input is opened. Nothing is written to `output` unless every stage succeeds.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    options.captions.validate()?;

    let tracer = Tracer::from_option(options.trace_path.clone());

    tracer.start(Stage::Ingest, format!("Reading {}", input.display()));
    let samples = read_samples_from_path(input, &options.reader)?;
    tracer.complete(
        Stage::Ingest,
        format!("Read {} samples", samples.len()),
        serde_json::json!({ "samples": samples.len() }),
    );

    let track = build_track(&samples, &options.captions, &tracer)?;

    tracer.start(Stage::Write, format!("Writing {}", output.display()));
    let summary = write_track(output, &track.cues)?;
    tracer.complete(
        Stage::Write,
        format!("Wrote {} cues", summary.cues),
        serde_json::json!({
            "output_path": summary.path.to_string_lossy(),
            "bytes": summary.bytes,
            "sha256": summary.sha256,
            "cues": summary.cues
        }),
    );

    Ok(ConversionReport {
        samples: samples.len(),
        max_pressure: track.range.max_pressure,
        scale_min: track.scale.scale_min,
        intervals: track.intervals,
        output: summary,
    })
}

// Callers validate `config` first
fn build_track(
    samples: &[Sample],
    config: &CaptionConfig,
    tracer: &Tracer,
) -> Result<Track, ConvertError> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(IngestError::EmptyInput.into()),
    };

    tracer.start(Stage::Calibrate, "Scanning for maximum pressure");
    let range = calibrate(samples).ok_or(IngestError::EmptyInput)?;
    let scale = MeterScale::from_config(config, &range)?;
    log::info!(
        "Meter window [{} Pa, {} Pa] over {} boxes",
        scale.scale_min,
        scale.scale_max,
        scale.num_boxes
    );
    tracer.complete(
        Stage::Calibrate,
        "Calibrated meter window",
        serde_json::json!({
            "max_pressure": range.max_pressure,
            "scale_min": scale.scale_min,
            "num_boxes": scale.num_boxes
        }),
    );

    tracer.start(Stage::Coalesce, "Merging equal-level samples");
    let intervals = coalesce(samples, scale, config.hold_ms);
    log::info!(
        "Coalesced {} samples into {} intervals",
        samples.len(),
        intervals.len()
    );
    tracer.complete(
        Stage::Coalesce,
        format!("Found {} intervals", intervals.len()),
        serde_json::json!({ "intervals": intervals.len() }),
    );

    tracer.start(Stage::Emit, "Rendering cues");
    let emitter = CueEmitter::new(config.clone());
    let cues = emitter.emit_track(first, last, &intervals);
    tracer.complete(
        Stage::Emit,
        format!("Emitted {} cues", cues.len()),
        serde_json::json!({ "cues": cues.len() }),
    );

    Ok(Track {
        range,
        scale,
        intervals: intervals.len(),
        cues,
    })
}
