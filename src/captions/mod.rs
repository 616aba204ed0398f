// Caption track generation
// Cue model, cue emission, and WebVTT serialization

pub mod emitter;
pub mod timestamp;
pub mod types;
pub mod writer;

pub use emitter::CueEmitter;
pub use timestamp::{format_duration, format_timestamp};
pub use types::{Cue, CueKind};
pub use writer::{render_track, write_track, WriteError, WriteSummary, HEADER};
