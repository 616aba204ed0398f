//! pressure-vtt - command-line entry point
//!
//! Converts a pressure sensor log into a WebVTT track carrying sound events
//! and a live meter for playback next to the recording.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use pressure_vtt::{convert_file, CaptionConfig, ConvertOptions, KpaSource, ReaderOptions, TimeUnit};

/// Command-line arguments for pressure-vtt
#[derive(Parser, Debug)]
#[command(name = "pressure-vtt")]
#[command(about = "Convert a pressure sensor log into a WebVTT caption track")]
#[command(version)]
struct Args {
    /// Sensor log with a header row (needs time and pressure columns)
    input: PathBuf,

    /// Output track; defaults to the input path with a .vtt extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pressure (Pa) the meter is anchored to
    #[arg(long, default_value_t = 99_000.0, env = "PRESSURE_VTT_THRESHOLD")]
    threshold: f64,

    /// Distance below the threshold where the meter starts (Pa)
    #[arg(long, default_value_t = 2_000.0, env = "PRESSURE_VTT_OFFSET")]
    offset: f64,

    /// Number of meter boxes
    #[arg(long, default_value_t = 12, env = "PRESSURE_VTT_BOXES")]
    boxes: u32,

    /// How long each sample holds its level (ms)
    #[arg(long, default_value_t = 310.0)]
    hold_ms: f64,

    /// Length of the stoveOn lead-in cue (ms)
    #[arg(long, default_value_t = 1_000.0)]
    lead_in_ms: f64,

    /// Gap between the last sample and the bell cue (ms)
    #[arg(long, default_value_t = 1_000.0)]
    trail_gap_ms: f64,

    /// Length of the bell cue (ms)
    #[arg(long, default_value_t = 1_000.0)]
    trail_ms: f64,

    /// Which sample's reading is printed on a meter cue
    #[arg(long, value_enum, default_value_t = KpaArg::IntervalLast)]
    kpa_source: KpaArg,

    /// Header name of the time column
    #[arg(long, default_value = "Time")]
    time_column: String,

    /// Header name of the pressure column
    #[arg(long, default_value = "Pa")]
    pressure_column: String,

    /// Unit of the time column
    #[arg(long, value_enum, default_value_t = TimeUnitArg::Ms)]
    time_unit: TimeUnitArg,

    /// Append a JSONL progress trace to this file
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Log per-interval detail
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KpaArg {
    /// Last reading inside the interval
    IntervalLast,
    /// Reading that ended the interval (legacy tracks)
    ClosingSample,
}

impl From<KpaArg> for KpaSource {
    fn from(arg: KpaArg) -> Self {
        match arg {
            KpaArg::IntervalLast => KpaSource::IntervalLast,
            KpaArg::ClosingSample => KpaSource::ClosingSample,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TimeUnitArg {
    Ms,
    S,
}

impl From<TimeUnitArg> for TimeUnit {
    fn from(arg: TimeUnitArg) -> Self {
        match arg {
            TimeUnitArg::Ms => TimeUnit::Milliseconds,
            TimeUnitArg::S => TimeUnit::Seconds,
        }
    }
}

impl Args {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            reader: ReaderOptions {
                time_column: self.time_column.clone(),
                pressure_column: self.pressure_column.clone(),
                time_unit: self.time_unit.into(),
            },
            captions: CaptionConfig {
                threshold: self.threshold,
                offset: self.offset,
                num_boxes: self.boxes,
                hold_ms: self.hold_ms,
                lead_in_ms: self.lead_in_ms,
                trail_gap_ms: self.trail_gap_ms,
                trail_ms: self.trail_ms,
                kpa_source: self.kpa_source.into(),
                ..CaptionConfig::default()
            },
            trace_path: self.trace.clone(),
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("vtt"))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let output = args.output_path();
    info!("Converting {} -> {}", args.input.display(), output.display());

    let report = convert_file(&args.input, &output, &args.options()).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            args.input.display(),
            output.display()
        )
    })?;

    info!(
        "Done: {} samples, {} intervals, max {} Pa, sha256 {}",
        report.samples, report.intervals, report.max_pressure, report.output.sha256
    );

    Ok(())
}
