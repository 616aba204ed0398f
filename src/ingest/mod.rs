// Sensor log ingestion
// Reads timestamped pressure samples from tabular logs

pub mod reader;

pub use reader::{read_samples, read_samples_from_path, IngestError, ReaderOptions, Sample, TimeUnit};
