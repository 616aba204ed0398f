// Signal calibration
// Single scan over the samples to find the top of the meter window

use serde::{Deserialize, Serialize};

use crate::ingest::Sample;

/// Observed extent of the pressure signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalRange {
    /// Highest pressure seen in the log (Pa)
    pub max_pressure: f64,
}

/// Scan all samples for the maximum pressure
///
/// Returns None for an empty slice; the reader refuses empty input, so the
/// pipeline never hits that case.
pub fn calibrate(samples: &[Sample]) -> Option<SignalRange> {
    samples
        .iter()
        .map(|s| s.pressure_pa)
        .reduce(f64::max)
        .map(|max_pressure| SignalRange { max_pressure })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibrate_finds_max() {
        let samples = vec![
            Sample::new(0.0, 50_000.0),
            Sample::new(310.0, 101_325.0),
            Sample::new(620.0, 100_000.0),
        ];

        let range = calibrate(&samples).unwrap();
        assert_eq!(range.max_pressure, 101_325.0);
    }

    #[test]
    fn test_calibrate_single_sample() {
        let range = calibrate(&[Sample::new(0.0, -5.0)]).unwrap();
        assert_eq!(range.max_pressure, -5.0);
    }

    #[test]
    fn test_calibrate_empty() {
        assert!(calibrate(&[]).is_none());
    }
}
