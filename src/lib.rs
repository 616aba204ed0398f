// Pressure VTT - Sensor log to caption track converter
// Module declarations

pub mod captions;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod signal;

pub use captions::{render_track, Cue, CueKind};
pub use config::{CaptionConfig, ConfigError, KpaSource};
pub use ingest::{ReaderOptions, Sample, TimeUnit};
pub use pipeline::{convert_file, convert_samples, ConversionReport, ConvertError, ConvertOptions};
