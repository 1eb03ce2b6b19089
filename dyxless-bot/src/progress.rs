//! Text progress bar and human-readable durations for chat messages.

use std::time::Duration;

const BAR_LENGTH: usize = 20;

/// `[████░░░…] 20.0%` with 20 cells.
pub fn progress_bar(current: usize, total: usize) -> String {
    let (filled, percent) = if total == 0 {
        (0, 0.0)
    } else {
        let current = current.min(total);
        (BAR_LENGTH * current / total, current as f64 * 100.0 / total as f64)
    };
    format!(
        "[{}{}] {:.1}%",
        "█".repeat(filled),
        "░".repeat(BAR_LENGTH - filled),
        percent
    )
}

/// `45 сек`, `3 мин 5 сек`, `2 ч 10 мин`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{} сек", secs)
    } else if secs < 3600 {
        format!("{} мин {} сек", secs / 60, secs % 60)
    } else {
        format!("{} ч {} мин", secs / 3600, (secs % 3600) / 60)
    }
}
