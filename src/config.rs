// Caption configuration
// Meter scaling, cue timing, and display policy for generated tracks

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which sample supplies the kPa reading shown on a closed interval's meter cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpaSource {
    /// Last sample that belongs to the interval being closed
    IntervalLast,

    /// Sample that triggered the closure (first sample of the next interval).
    /// Matches tracks produced by the legacy script.
    ClosingSample,
}

/// Settings that shape the generated caption track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionConfig {
    /// Pressure (Pa) around which the meter is anchored
    pub threshold: f64,

    /// Distance below `threshold` where the meter starts (Pa)
    /// scaleMin = threshold - offset
    pub offset: f64,

    /// Meter resolution; levels run from 0 to `num_boxes` inclusive
    pub num_boxes: u32,

    /// How long a sample holds its level after its timestamp (ms)
    pub hold_ms: f64,

    /// Length of the stoveOn sentinel that ends at the first sample (ms)
    pub lead_in_ms: f64,

    /// Gap between the last sample and the bell sentinel (ms)
    pub trail_gap_ms: f64,

    /// Length of the bell sentinel (ms)
    pub trail_ms: f64,

    /// kPa value policy for meter cues
    pub kpa_source: KpaSource,

    /// Glyph for a filled meter box
    pub filled_glyph: char,

    /// Glyph for an empty meter box
    pub empty_glyph: char,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        CaptionConfig {
            threshold: 99_000.0,
            offset: 2_000.0,
            num_boxes: 12,
            hold_ms: 310.0,
            lead_in_ms: 1_000.0,
            trail_gap_ms: 1_000.0,
            trail_ms: 1_000.0,
            kpa_source: KpaSource::IntervalLast,
            filled_glyph: '■',
            empty_glyph: '□',
        }
    }
}

impl CaptionConfig {
    /// Lower edge of the scaling window
    pub fn scale_min(&self) -> f64 {
        self.threshold - self.offset
    }

    /// Reject settings that would produce a meaningless track
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_boxes == 0 {
            return Err(ConfigError::Invalid(
                "num_boxes must be at least 1".to_string(),
            ));
        }

        if !self.threshold.is_finite() || !self.offset.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "threshold ({}) and offset ({}) must be finite",
                self.threshold, self.offset
            )));
        }

        let durations = [
            ("hold_ms", self.hold_ms),
            ("lead_in_ms", self.lead_in_ms),
            ("trail_gap_ms", self.trail_gap_ms),
            ("trail_ms", self.trail_ms),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number of milliseconds, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_constants() {
        let config = CaptionConfig::default();

        assert_eq!(config.threshold, 99_000.0);
        assert_eq!(config.offset, 2_000.0);
        assert_eq!(config.num_boxes, 12);
        assert_eq!(config.hold_ms, 310.0);
        assert_eq!(config.lead_in_ms, 1_000.0);
        assert_eq!(config.scale_min(), 97_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_boxes_rejected() {
        let config = CaptionConfig {
            num_boxes: 0,
            ..CaptionConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_hold_rejected() {
        let config = CaptionConfig {
            hold_ms: -1.0,
            ..CaptionConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hold_ms"));
    }

    #[test]
    fn test_kpa_source_serializes_snake_case() {
        let json = serde_json::to_string(&KpaSource::ClosingSample).unwrap();
        assert_eq!(json, "\"closing_sample\"");
    }
}
