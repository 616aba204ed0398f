// Cue emission
// Renders closed level intervals and track sentinels into cues

use crate::config::{CaptionConfig, KpaSource};
use crate::ingest::Sample;
use crate::signal::ClosedInterval;

use super::timestamp::format_duration;
use super::types::{Cue, CueKind};

/// Sound played as the track begins
pub const LEAD_IN_SOUND: &str = "stoveOn";

/// Sound played once the recording is over
pub const TRAIL_OUT_SOUND: &str = "bell";

/// Builds cue text from closed intervals using the caption settings
#[derive(Debug, Clone)]
pub struct CueEmitter {
    config: CaptionConfig,
}

impl CueEmitter {
    pub fn new(config: CaptionConfig) -> Self {
        CueEmitter { config }
    }

    /// Sentinel ending exactly at the first sample; never starts before zero
    /// and never ends before it starts
    pub fn lead_in(&self, first: &Sample) -> Cue {
        let start_ms = (first.time_ms - self.config.lead_in_ms).max(0.0);
        let end_ms = first.time_ms.max(start_ms);
        Cue::sentinel(start_ms, end_ms, LEAD_IN_SOUND)
    }

    /// Sentinel starting a fixed gap after the last sample
    pub fn trail_out(&self, last: &Sample) -> Cue {
        let start_ms = last.time_ms + self.config.trail_gap_ms;
        Cue::sentinel(start_ms, start_ms + self.config.trail_ms, TRAIL_OUT_SOUND)
    }

    /// Event cue followed by its meter cue, both spanning the interval
    pub fn interval_cues(&self, closed: &ClosedInterval) -> [Cue; 2] {
        let interval = &closed.interval;

        let event = Cue {
            start_ms: interval.start_ms,
            end_ms: interval.end_ms,
            kind: CueKind::Event,
            identifier: Some(format!("NextSound : {}", interval.level)),
            text: format!(
                "Sound : {}\nDuration : {}",
                interval.level,
                format_duration(interval.duration_ms())
            ),
        };

        let meter = Cue {
            start_ms: interval.start_ms,
            end_ms: interval.end_ms,
            kind: CueKind::Meter,
            identifier: None,
            text: format!(
                "{}  {:.2} kPa",
                self.meter_glyphs(interval.level),
                self.display_sample(closed).kpa()
            ),
        };

        [event, meter]
    }

    /// `level` filled boxes followed by the remaining empty ones
    pub fn meter_glyphs(&self, level: u32) -> String {
        let filled = level.min(self.config.num_boxes);
        let empty = self.config.num_boxes - filled;

        std::iter::repeat(self.config.filled_glyph)
            .take(filled as usize)
            .chain(std::iter::repeat(self.config.empty_glyph).take(empty as usize))
            .collect()
    }

    /// Sample whose reading is printed on the meter, per the kPa policy
    pub fn display_sample<'a>(&self, closed: &'a ClosedInterval) -> &'a Sample {
        match self.config.kpa_source {
            KpaSource::IntervalLast => &closed.last_sample,
            KpaSource::ClosingSample => &closed.closing_sample,
        }
    }

    /// Assemble the whole track: lead-in, interval pairs in order, trail-out
    pub fn emit_track(&self, first: &Sample, last: &Sample, intervals: &[ClosedInterval]) -> Vec<Cue> {
        let mut cues = Vec::with_capacity(intervals.len() * 2 + 2);

        cues.push(self.lead_in(first));
        for closed in intervals {
            log::debug!(
                "Interval level {} [{} ms, {} ms]",
                closed.interval.level,
                closed.interval.start_ms,
                closed.interval.end_ms
            );
            cues.extend(self.interval_cues(closed));
        }
        cues.push(self.trail_out(last));

        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Interval;

    fn closed_interval(level: u32, start_ms: f64, end_ms: f64) -> ClosedInterval {
        ClosedInterval {
            interval: Interval {
                level,
                start_ms,
                end_ms,
            },
            last_sample: Sample::new(end_ms - 310.0, 50_000.0),
            closing_sample: Sample::new(end_ms, 100_000.0),
        }
    }

    #[test]
    fn test_meter_glyphs() {
        let emitter = CueEmitter::new(CaptionConfig::default());

        assert_eq!(emitter.meter_glyphs(0), "□□□□□□□□□□□□");
        assert_eq!(emitter.meter_glyphs(3), "■■■□□□□□□□□□");
        assert_eq!(emitter.meter_glyphs(12), "■■■■■■■■■■■■");
    }

    #[test]
    fn test_lead_in_ends_at_first_sample() {
        let emitter = CueEmitter::new(CaptionConfig::default());

        let cue = emitter.lead_in(&Sample::new(5_000.0, 0.0));
        assert_eq!(cue.start_ms, 4_000.0);
        assert_eq!(cue.end_ms, 5_000.0);
        assert_eq!(cue.text, "Sound: stoveOn");
    }

    #[test]
    fn test_lead_in_clamped_at_zero() {
        let emitter = CueEmitter::new(CaptionConfig::default());

        let cue = emitter.lead_in(&Sample::new(400.0, 0.0));
        assert_eq!(cue.start_ms, 0.0);
        assert_eq!(cue.end_ms, 400.0);
    }

    #[test]
    fn test_lead_in_negative_first_time() {
        let emitter = CueEmitter::new(CaptionConfig::default());

        let cue = emitter.lead_in(&Sample::new(-250.0, 0.0));
        assert_eq!(cue.start_ms, 0.0);
        assert_eq!(cue.end_ms, 0.0);
        assert!(cue.duration_ms() >= 0.0);
    }

    #[test]
    fn test_trail_out_after_last_sample() {
        let emitter = CueEmitter::new(CaptionConfig::default());

        let cue = emitter.trail_out(&Sample::new(620.0, 0.0));
        assert_eq!(cue.start_ms, 1_620.0);
        assert_eq!(cue.end_ms, 2_620.0);
        assert_eq!(cue.text, "Sound: bell");
    }

    #[test]
    fn test_interval_cues_share_span() {
        let emitter = CueEmitter::new(CaptionConfig::default());

        let [event, meter] = emitter.interval_cues(&closed_interval(0, 0.0, 620.0));

        assert_eq!(event.identifier.as_deref(), Some("NextSound : 0"));
        assert_eq!(event.text, "Sound : 0\nDuration : 620.0");
        assert_eq!(meter.kind, CueKind::Meter);
        assert_eq!((meter.start_ms, meter.end_ms), (event.start_ms, event.end_ms));
        assert_eq!(meter.text, "□□□□□□□□□□□□  50.00 kPa");
    }

    #[test]
    fn test_closing_sample_policy_shows_next_reading() {
        // Legacy tracks print the reading that ended the interval, not one from inside it
        let config = CaptionConfig {
            kpa_source: KpaSource::ClosingSample,
            ..CaptionConfig::default()
        };
        let emitter = CueEmitter::new(config);

        let [_, meter] = emitter.interval_cues(&closed_interval(0, 0.0, 620.0));
        assert_eq!(meter.text, "□□□□□□□□□□□□  100.00 kPa");
    }

    #[test]
    fn test_emit_track_order() {
        let emitter = CueEmitter::new(CaptionConfig::default());
        let intervals = vec![closed_interval(0, 0.0, 620.0), closed_interval(12, 620.0, 930.0)];

        let cues = emitter.emit_track(
            &Sample::new(0.0, 50_000.0),
            &Sample::new(620.0, 100_000.0),
            &intervals,
        );

        let kinds: Vec<CueKind> = cues.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CueKind::Sentinel,
                CueKind::Event,
                CueKind::Meter,
                CueKind::Event,
                CueKind::Meter,
                CueKind::Sentinel,
            ]
        );
        assert!(cues.windows(2).all(|w| w[0].start_ms <= w[1].start_ms));
    }
}
