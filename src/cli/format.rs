//! Output formatting for CLI display.

use jiff::civil::DateTime;
use uuid::Uuid;

use shiftcover::coverage::CoverageSummary;
use shiftcover::model::{CoverageEntry, WindowSpec};
use shiftcover::window::{Window, format_time};

/// The first eight characters of an id, enough to pass back as a prefix.
pub(super) fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// `2026-03-02 12:00-16:00`, or both dates when the window crosses midnight.
pub(super) fn format_window(window: &Window) -> String {
    let (start, end) = (window.start, window.end);
    if start.date() == end.date() {
        format!(
            "{} {}-{}",
            start.date(),
            format_time(start.time()),
            format_time(end.time())
        )
    } else {
        format!("{} -> {}", format_instant(start), format_instant(end))
    }
}

pub(super) fn format_instant(at: DateTime) -> String {
    format!("{} {}", at.date(), format_time(at.time()))
}

/// A window as stored, which may be missing fields or not resolve at all.
pub(super) fn format_spec(spec: &WindowSpec) -> String {
    let field = |f: &Option<String>| f.clone().unwrap_or_else(|| "?".to_string());
    let start = format!("{} {}", field(&spec.start_date), field(&spec.start_time));
    let end = match &spec.end_date {
        Some(date) => format!("{date} {}", field(&spec.end_time)),
        None => field(&spec.end_time),
    };
    format!("{start} -> {end}")
}

/// `4h30m`, `45m`, `24h`.
pub(super) fn format_minutes(minutes: i64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m}m"),
    }
}

pub(super) fn format_entry(entry: &CoverageEntry) -> String {
    format!(
        "{}  [{}]  {}  {}",
        short_id(&entry.id),
        entry.status.as_str(),
        format_spec(&entry.window),
        entry.covering()
    )
}

/// Multi-line coverage report for `shift show`.
///
/// With `step_minutes`, each gap also lists the start times a taker may pick.
pub(super) fn format_summary(summary: &CoverageSummary, step_minutes: Option<i64>) -> String {
    let mut lines = Vec::new();

    match &summary.coverage_window {
        Some(window) => lines.push(format!(
            "Coverage window: {} ({})",
            format_window(window),
            summary.request_type.as_str()
        )),
        None => lines.push("Coverage window: does not resolve".to_string()),
    }

    lines.push(format!(
        "Covered: {} of {} ({:.0}%), {} approved",
        format_minutes(summary.covered_minutes),
        format_minutes(summary.total_minutes),
        summary.ratio() * 100.0,
        summary.approved_count
    ));

    if summary.is_fully_covered {
        lines.push("Fully covered".to_string());
    } else if !summary.missing_segments.is_empty() {
        lines.push("Missing:".to_string());
        for gap in &summary.missing_segments {
            lines.push(format!("  {}  ({})", format_window(gap), format_minutes(gap.minutes())));
            if let Some(step) = step_minutes {
                let times = shiftcover::selection::selectable_times(gap, step)
                    .into_iter()
                    .map(|t| format_time(t.time()))
                    .collect::<Vec<_>>()
                    .join(" ");
                lines.push(format!("    {times}"));
            }
        }
    }

    if summary.skipped > 0 {
        lines.push(format!("Skipped {} unreadable coverage entries", summary.skipped));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    fn mon(hour: i8) -> DateTime {
        date(2026, 3, 2).at(hour, 0, 0, 0)
    }

    #[test]
    fn same_day_window_shows_one_date() {
        let window = Window::new(mon(12), mon(16));
        assert_eq!(format_window(&window), "2026-03-02 12:00-16:00");
    }

    #[test]
    fn overnight_window_shows_both_dates() {
        let window = Window::new(mon(21), date(2026, 3, 3).at(9, 0, 0, 0));
        assert_eq!(
            format_window(&window),
            "2026-03-02 21:00 -> 2026-03-03 09:00"
        );
    }

    #[test]
    fn minutes_read_as_hours() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(1440), "24h");
        assert_eq!(format_minutes(270), "4h30m");
    }

    #[test]
    fn spec_marks_missing_fields() {
        let spec = WindowSpec {
            start_date: Some("2026-03-02".into()),
            start_time: Some("12:00".into()),
            end_date: None,
            end_time: None,
        };
        assert_eq!(format_spec(&spec), "2026-03-02 12:00 -> ?");
    }

    #[test]
    fn short_id_is_a_prefix() {
        let id = Uuid::new_v4();
        assert!(id.to_string().starts_with(&short_id(&id)));
        assert_eq!(short_id(&id).len(), 8);
    }
}
