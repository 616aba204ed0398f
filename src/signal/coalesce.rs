// Run-length coalescing of meter levels
// Merges consecutive samples that share a level into one interval

use serde::{Deserialize, Serialize};

use super::quantize::MeterScale;
use crate::ingest::Sample;

/// A span of time during which the meter held one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub level: u32,
    pub start_ms: f64,
    pub end_ms: f64,
}

impl Interval {
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}

/// An interval that will not grow any further
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedInterval {
    pub interval: Interval,

    /// Last sample that extended the interval
    pub last_sample: Sample,

    /// Sample under examination when the interval closed.
    /// On a level change this is the first sample of the next run; on the
    /// end-of-input flush it is the final sample.
    pub closing_sample: Sample,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Open { interval: Interval, last_sample: Sample },
}

/// Level state machine: Idle -> Open -> (Open | flushed)
///
/// Feed samples in time order; each level change hands back the interval it
/// closed. Call `flush` once at end of input for the interval still open.
#[derive(Debug, Clone)]
pub struct Coalescer {
    scale: MeterScale,
    hold_ms: f64,
    state: State,
}

impl Coalescer {
    pub fn new(scale: MeterScale, hold_ms: f64) -> Self {
        Coalescer {
            scale,
            hold_ms,
            state: State::Idle,
        }
    }

    /// Advance the state machine by one sample
    pub fn feed(&mut self, sample: Sample) -> Option<ClosedInterval> {
        let level = self.scale.level(sample.pressure_pa);
        let hold_end = sample.time_ms + self.hold_ms;

        if let State::Open {
            interval,
            last_sample,
        } = &mut self.state
        {
            if interval.level == level {
                // Start stays put; only the hold end moves
                interval.end_ms = hold_end;
                *last_sample = sample;
                return None;
            }
        }

        let opened = State::Open {
            interval: Interval {
                level,
                start_ms: sample.time_ms,
                end_ms: hold_end,
            },
            last_sample: sample,
        };

        match std::mem::replace(&mut self.state, opened) {
            State::Idle => None,
            State::Open {
                interval,
                last_sample,
            } => Some(ClosedInterval {
                interval,
                last_sample,
                closing_sample: sample,
            }),
        }
    }

    /// Close whatever interval is still open
    pub fn flush(&mut self) -> Option<ClosedInterval> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Open {
                interval,
                last_sample,
            } => Some(ClosedInterval {
                interval,
                last_sample,
                closing_sample: last_sample,
            }),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }
}

/// Run a full pass over the samples and collect every closed interval
pub fn coalesce(samples: &[Sample], scale: MeterScale, hold_ms: f64) -> Vec<ClosedInterval> {
    let mut coalescer = Coalescer::new(scale, hold_ms);
    let mut closed: Vec<ClosedInterval> = samples
        .iter()
        .filter_map(|&sample| coalescer.feed(sample))
        .collect();

    closed.extend(coalescer.flush());
    closed
}
