// WebVTT time formatting

/// Format milliseconds as `HH:MM:SS.mmm`
///
/// Fractional milliseconds are truncated and hours are never wrapped.
/// Negative or non-finite input renders as zero.
pub fn format_timestamp(ms: f64) -> String {
    let total_ms = if ms.is_finite() && ms > 0.0 {
        ms.floor() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Format a cue duration in milliseconds
///
/// Whole values keep a trailing `.0` (`620.0`), which downstream players
/// already parse.
pub fn format_duration(ms: f64) -> String {
    if ms.fract() == 0.0 {
        format!("{:.1}", ms)
    } else {
        format!("{}", ms)
    }
}
