// Sensor log reader
// Parses (time, pressure) rows out of a headed tabular file

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read tabular input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' not found in header")]
    MissingColumn { column: String },

    #[error("Malformed input at data row {row}, column '{column}': {reason}")]
    MalformedInput {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Input contains no data rows")]
    EmptyInput,
}

/// Unit of the time column in the source log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Convert a raw time value to milliseconds
    pub fn to_millis(&self, value: f64) -> f64 {
        match self {
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value * 1000.0,
        }
    }
}

/// Where to find the signal in the source log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderOptions {
    /// Header name of the time column
    pub time_column: String,

    /// Header name of the pressure column (pascals)
    pub pressure_column: String,

    /// Unit the time column is recorded in
    pub time_unit: TimeUnit,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            time_column: "Time".to_string(),
            pressure_column: "Pa".to_string(),
            time_unit: TimeUnit::Milliseconds,
        }
    }
}

/// One row of the sensor log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample time in milliseconds from the start of the recording
    pub time_ms: f64,

    /// Pressure in pascals
    pub pressure_pa: f64,
}

impl Sample {
    pub fn new(time_ms: f64, pressure_pa: f64) -> Self {
        Sample {
            time_ms,
            pressure_pa,
        }
    }

    /// Pressure in kilopascals, as shown on the meter
    pub fn kpa(&self) -> f64 {
        self.pressure_pa / 1000.0
    }
}

/// Read all samples from a file on disk
pub fn read_samples_from_path(
    path: &Path,
    options: &ReaderOptions,
) -> Result<Vec<Sample>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let samples = read_samples(file, options)?;
    log::info!("Read {} samples from {}", samples.len(), path.display());

    Ok(samples)
}

/// Read all samples from any tabular source with a header row
///
/// Extra columns are ignored. Rows are kept in file order; decreasing
/// timestamps are reported but not re-sorted.
pub fn read_samples<R: Read>(source: R, options: &ReaderOptions) -> Result<Vec<Sample>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let time_idx = column_index(&headers, &options.time_column)?;
    let pressure_idx = column_index(&headers, &options.pressure_column)?;

    let mut samples = Vec::new();
    let mut previous_time: Option<f64> = None;

    for (i, record) in reader.byte_records().enumerate() {
        let record = record?;
        let row = i + 1;

        let time = parse_field(&record, time_idx, &options.time_column, row)?;
        let pressure_pa = parse_field(&record, pressure_idx, &options.pressure_column, row)?;
        let time_ms = options.time_unit.to_millis(time);

        if let Some(previous) = previous_time {
            if time_ms < previous {
                log::warn!(
                    "Data row {} goes back in time ({} ms after {} ms); rows are not re-sorted",
                    row,
                    time_ms,
                    previous
                );
            }
        }
        previous_time = Some(time_ms);

        samples.push(Sample::new(time_ms, pressure_pa));
    }

    if samples.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    Ok(samples)
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|name| name == column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
        })
}

fn parse_field(
    record: &csv::ByteRecord,
    idx: usize,
    column: &str,
    row: usize,
) -> Result<f64, IngestError> {
    let malformed = |reason: String| IngestError::MalformedInput {
        row,
        column: column.to_string(),
        reason,
    };

    let raw = match record.get(idx) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(malformed("missing value".to_string())),
    };
    let raw = std::str::from_utf8(raw).map_err(|_| malformed("not valid UTF-8".to_string()))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| malformed(format!("'{}' is not a number", raw)))?;

    if !value.is_finite() {
        return Err(malformed(format!("'{}' is not a finite number", raw)));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read(input: &str) -> Result<Vec<Sample>, IngestError> {
        read_samples(input.as_bytes(), &ReaderOptions::default())
    }

    #[test]
    fn test_reads_samples_in_order() {
        let samples = read("Time,Pa\n0,50000\n310,50000\n620,100000\n").unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], Sample::new(0.0, 50_000.0));
        assert_eq!(samples[2], Sample::new(620.0, 100_000.0));
        assert_eq!(samples[2].kpa(), 100.0);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let samples = read("Temp,Pa,Time,Note\n21.5,98000,10,ok\n21.6,98100,20,\n").unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1], Sample::new(20.0, 98_100.0));
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let err = read("Time,Pa\n").unwrap_err();
        assert!(matches!(err, IngestError::EmptyInput));
    }

    #[test]
    fn test_blank_file_is_empty_input() {
        let err = read("").unwrap_err();
        assert!(matches!(err, IngestError::EmptyInput));
    }

    #[test]
    fn test_missing_column() {
        let err = read("Time,Pressure\n0,1\n").unwrap_err();

        match err {
            IngestError::MissingColumn { column } => assert_eq!(column, "Pa"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_reports_row() {
        let err = read("Time,Pa\n0,50000\n310,abc\n").unwrap_err();

        match err {
            IngestError::MalformedInput { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Pa");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_short_row_reports_missing_value() {
        let err = read("Time,Pa\n0,50000\n310\n").unwrap_err();

        match err {
            IngestError::MalformedInput { row, reason, .. } => {
                assert_eq!(row, 2);
                assert_eq!(reason, "missing value");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_nan_is_malformed() {
        let err = read("Time,Pa\n0,NaN\n").unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput { row: 1, .. }));
    }

    #[test]
    fn test_seconds_time_unit() {
        let options = ReaderOptions {
            time_unit: TimeUnit::Seconds,
            ..ReaderOptions::default()
        };

        let samples = read_samples("Time,Pa\n1.5,99000\n".as_bytes(), &options).unwrap();
        assert_eq!(samples[0].time_ms, 1500.0);
    }

    #[test]
    fn test_custom_column_names() {
        let options = ReaderOptions {
            time_column: "t_ms".to_string(),
            pressure_column: "pressure".to_string(),
            ..ReaderOptions::default()
        };

        let samples = read_samples("t_ms,pressure\n5,101000\n".as_bytes(), &options).unwrap();
        assert_eq!(samples[0], Sample::new(5.0, 101_000.0));
    }

    #[test]
    fn test_unsorted_rows_are_kept() {
        let samples = read("Time,Pa\n620,1\n0,2\n").unwrap();

        assert_eq!(samples[0].time_ms, 620.0);
        assert_eq!(samples[1].time_ms, 0.0);
    }

    #[test]
    fn test_invalid_utf8_value_is_malformed() {
        let input: &[u8] = b"Time,Pa\n0,50000\n310,\xff\xfe\n";

        let err = read_samples(input, &ReaderOptions::default()).unwrap_err();
        match err {
            IngestError::MalformedInput { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Pa");
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_read_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        fs::write(&path, "Time,Pa\n0,99000\n").unwrap();

        let samples = read_samples_from_path(&path, &ReaderOptions::default()).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.csv");

        let err = read_samples_from_path(&path, &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
        assert!(err.to_string().contains("absent.csv"));
    }
}
