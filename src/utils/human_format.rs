//! Human-readable formatting for run timings and ratios

use std::time::Duration;

/// Formats a duration to a compact human-readable string
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();

    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        let seconds = duration.as_secs_f64();
        if seconds >= 10.0 {
            format!("{:.1}s", seconds)
        } else {
            format!("{:.2}s", seconds)
        }
    } else if millis < 3_600_000 {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, seconds)
        }
    } else {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 && minutes == 0 {
            format!("{}h", hours)
        } else if seconds == 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h{}m{}s", hours, minutes, seconds)
        }
    }
}

/// Percentage with one decimal place, e.g. `66.7%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
