//! Progress reporting seam and ETA formatting.

use std::time::Duration;

/// One-way sink for progress updates.
///
/// Delivery is best-effort: implementations must not fail, and the pipeline
/// never depends on an update being seen.
pub trait ProgressObserver {
    /// Report overall progress as a percentage plus a status line.
    fn progress(&self, percent: u8, text: &str);
}

/// Format a remaining-time estimate as a short human-readable string.
#[must_use]
pub fn format_eta(remaining: Duration) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_secs = remaining.as_secs_f64().round() as u64;

    if total_secs < 60 {
        return format!("~{total_secs}s left");
    }

    let mins = total_secs / 60;
    let secs = total_secs % 60;
    if mins < 60 {
        return if secs > 0 {
            format!("~{mins}m {secs}s left")
        } else {
            format!("~{mins}m left")
        };
    }

    let hours = mins / 60;
    let rem_mins = mins % 60;
    if rem_mins > 0 {
        format!("~{hours}h {rem_mins}m left")
    } else {
        format!("~{hours}h left")
    }
}
