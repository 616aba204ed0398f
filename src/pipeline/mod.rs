// Pipeline execution and monitoring module
// Orchestrates the full log-to-captions conversion

pub mod convert;
pub mod trace;

pub use convert::{convert_file, convert_samples, ConversionReport, ConvertError, ConvertOptions, Track};
pub use trace::{read_trace_file, Stage, TraceEntry, TraceError, TraceWriter, Tracer};
