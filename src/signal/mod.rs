// Signal processing - calibration, meter quantization, and run coalescing
// Turns raw pressure samples into level intervals

pub mod calibration;
pub mod coalesce;
pub mod quantize;

pub use calibration::{calibrate, SignalRange};
pub use coalesce::{coalesce, ClosedInterval, Coalescer, Interval};
pub use quantize::{MeterScale, ScaleError};
