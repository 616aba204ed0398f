// Caption cue types
// The atomic timed blocks that make up a track

use serde::{Deserialize, Serialize};

/// Cue settings that pin captions to the left edge of the frame
pub const ALIGN_START: &str = "align:start position:0%";

/// Role of a cue within the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    /// Fixed marker at the start or end of the track
    Sentinel,

    /// Announces a level interval and its duration
    Event,

    /// Glyph bar and kPa reading for the same interval as the preceding event
    Meter,
}

/// One timed block in the output track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub start_ms: f64,
    pub end_ms: f64,
    pub kind: CueKind,

    /// Optional WebVTT cue identifier, written above the timing line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// Payload; may span several lines
    pub text: String,
}

impl Cue {
    pub fn sentinel(start_ms: f64, end_ms: f64, sound: &str) -> Self {
        Cue {
            start_ms,
            end_ms,
            kind: CueKind::Sentinel,
            identifier: None,
            text: format!("Sound: {}", sound),
        }
    }

    /// Cue settings written after the timing line
    pub fn settings(&self) -> Option<&'static str> {
        match self.kind {
            CueKind::Sentinel | CueKind::Event => Some(ALIGN_START),
            CueKind::Meter => None,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}
