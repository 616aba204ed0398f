// Meter quantization
// Maps a pressure reading onto a discrete 0..=num_boxes meter level

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::calibration::SignalRange;
use crate::config::CaptionConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("Degenerate scaling window: min {scale_min} Pa is not below max {scale_max} Pa")]
    DegenerateRange { scale_min: f64, scale_max: f64 },
}

/// Linear scale from the window [scale_min, scale_max] to meter boxes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterScale {
    pub scale_min: f64,
    pub scale_max: f64,
    pub num_boxes: u32,
}

impl MeterScale {
    /// Build a scale, refusing windows with no positive width
    pub fn new(scale_min: f64, scale_max: f64, num_boxes: u32) -> Result<Self, ScaleError> {
        let width = scale_max - scale_min;
        if !width.is_finite() || width <= 0.0 {
            return Err(ScaleError::DegenerateRange {
                scale_min,
                scale_max,
            });
        }

        Ok(MeterScale {
            scale_min,
            scale_max,
            num_boxes,
        })
    }

    /// Window [threshold - offset, max_pressure] from config and calibration
    pub fn from_config(config: &CaptionConfig, range: &SignalRange) -> Result<Self, ScaleError> {
        MeterScale::new(config.scale_min(), range.max_pressure, config.num_boxes)
    }

    pub fn range(&self) -> f64 {
        self.scale_max - self.scale_min
    }

    /// Quantize a pressure value
    ///
    /// Values outside the window are clamped first, so `scale_max` maps to
    /// exactly `num_boxes` and anything at or below `scale_min` maps to 0.
    pub fn level(&self, pressure_pa: f64) -> u32 {
        let clamped = pressure_pa.clamp(self.scale_min, self.scale_max);
        let scaled = (clamped - self.scale_min) / self.range() * self.num_boxes as f64;

        (scaled.floor() as u32).min(self.num_boxes)
    }
}
