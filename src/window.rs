//! Interval normalization: from recorded date/time strings to definite windows.
//!
//! Every instant is a civil (wall-clock) date-time. Shifts are planned in
//! local time and never cross a time zone, so no zone is attached.

use jiff::{
    ToSpan,
    civil::{self, Date, DateTime, Time},
};
use serde::{Deserialize, Serialize};

use crate::model::{WindowSpec, present};

/// Time used when a record carries a date but no time.
pub const DEFAULT_TIME: Time = civil::time(9, 0, 0, 0);

/// A half-open window `[start, end)`.
///
/// A window with `start >= end` is degenerate: it covers nothing and is
/// dropped wherever windows are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime,
    pub end: DateTime,
}

impl Window {
    pub fn new(start: DateTime, end: DateTime) -> Self {
        Self { start, end }
    }

    /// True when the window covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether the two windows share any time.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely inside this window.
    pub fn contains(&self, other: &Window) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Length in whole minutes. Degenerate windows are zero.
    pub fn minutes(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        self.start.duration_until(self.end).as_mins()
    }

    /// The window written back as date and time strings.
    pub fn to_spec(&self) -> WindowSpec {
        WindowSpec {
            start_date: Some(self.start.date().to_string()),
            start_time: Some(format_time(self.start.time())),
            end_date: Some(self.end.date().to_string()),
            end_time: Some(format_time(self.end.time())),
        }
    }
}

/// Resolve a recorded window into definite instants.
///
/// Missing times default to [`DEFAULT_TIME`] and a missing end date defaults
/// to the start date. When the end lands on or before the start, it moves
/// forward exactly one day, so `09:00`-`09:00` on one date is a 24-hour shift.
///
/// Returns `None` when the start date is missing, any present field fails to
/// parse, or the window is still degenerate after the rollover. Callers
/// exclude such records rather than failing.
pub fn resolve(spec: &WindowSpec) -> Option<Window> {
    let start_date = present(&spec.start_date)?;
    let end_date = present(&spec.end_date).unwrap_or(start_date);

    let start = instant(start_date, present(&spec.start_time))?;
    let mut end = instant(end_date, present(&spec.end_time))?;

    if end <= start {
        end = end.checked_add(1.day()).ok()?;
    }

    let window = Window::new(start, end);
    (!window.is_empty()).then_some(window)
}

/// Resolve a window recorded relative to `within`, such as coverage of a
/// shift or a request against it.
///
/// Missing fields come from `within`, except the end date, which follows
/// the window's own start date. When no start date is recorded and the
/// times land before `within` starts, they belong to the next day: on a
/// `09:00`-`09:00` shift, `03:00`-`09:00` is the morning after.
pub fn resolve_within(spec: &WindowSpec, within: &Window) -> Option<Window> {
    let fill = WindowSpec {
        end_date: None,
        ..within.to_spec()
    };
    let resolved = resolve(&spec.or(&fill))?;
    if present(&spec.start_date).is_some() || resolved.start >= within.start {
        return Some(resolved);
    }

    let start = resolved.start.checked_add(1.day()).ok()?;
    let end = match present(&spec.end_date) {
        Some(_) => resolved.end,
        None => resolved.end.checked_add(1.day()).ok()?,
    };
    let window = Window::new(start, end);
    (!window.is_empty()).then_some(window)
}

/// Combine a date and an optional time into an instant.
pub fn instant(date: &str, time: Option<&str>) -> Option<DateTime> {
    let date = parse_date(date)?;
    let time = match time {
        Some(raw) => parse_time(raw)?,
        None => DEFAULT_TIME,
    };
    Some(date.to_datetime(time))
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<Date> {
    raw.trim().parse().ok()
}

/// Parse `HH:mm`, tolerating seconds.
pub fn parse_time(raw: &str) -> Option<Time> {
    let raw = raw.trim();
    raw.parse::<Time>()
        .or_else(|_| Time::strptime("%H:%M", raw))
        .ok()
}

/// Parse a full instant: `YYYY-MM-DD HH:mm` or `YYYY-MM-DDTHH:mm`.
pub fn parse_datetime(raw: &str) -> Option<DateTime> {
    let raw = raw.trim();
    raw.parse::<DateTime>()
        .or_else(|_| DateTime::strptime("%Y-%m-%d %H:%M", raw))
        .ok()
}

/// `HH:mm`.
pub fn format_time(time: Time) -> String {
    time.strftime("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    fn spec(sd: &str, st: Option<&str>, ed: Option<&str>, et: Option<&str>) -> WindowSpec {
        WindowSpec {
            start_date: Some(sd.into()),
            start_time: st.map(String::from),
            end_date: ed.map(String::from),
            end_time: et.map(String::from),
        }
    }

    #[test]
    fn equal_times_roll_to_next_day() {
        let w = resolve(&spec("2026-03-02", Some("09:00"), None, Some("09:00"))).unwrap();

        assert_eq!(w.start, date(2026, 3, 2).at(9, 0, 0, 0));
        assert_eq!(w.end, date(2026, 3, 3).at(9, 0, 0, 0));
        assert_eq!(w.minutes(), 24 * 60);
    }

    #[test]
    fn missing_times_default_to_nine() {
        let w = resolve(&spec("2026-03-02", None, None, None)).unwrap();

        assert_eq!(w.start, date(2026, 3, 2).at(9, 0, 0, 0));
        assert_eq!(w.end, date(2026, 3, 3).at(9, 0, 0, 0));
    }

    #[test]
    fn end_before_start_rolls_once() {
        let w = resolve(&spec("2026-03-02", Some("22:00"), None, Some("06:00"))).unwrap();

        assert_eq!(w.end, date(2026, 3, 3).at(6, 0, 0, 0));
        assert_eq!(w.minutes(), 8 * 60);
    }

    #[test]
    fn times_after_midnight_land_on_the_next_day() {
        let shift = resolve(&spec("2026-03-02", Some("09:00"), None, Some("09:00"))).unwrap();
        let tail = WindowSpec {
            start_time: Some("03:00".into()),
            end_time: Some("09:00".into()),
            ..WindowSpec::default()
        };

        let w = resolve_within(&tail, &shift).unwrap();

        assert_eq!(w.start, date(2026, 3, 3).at(3, 0, 0, 0));
        assert_eq!(w.end, date(2026, 3, 3).at(9, 0, 0, 0));
    }

    #[test]
    fn times_inside_the_first_day_stay_put() {
        let shift = resolve(&spec("2026-03-02", Some("09:00"), None, Some("09:00"))).unwrap();
        let evening = WindowSpec {
            start_time: Some("16:00".into()),
            end_time: Some("09:00".into()),
            ..WindowSpec::default()
        };

        let w = resolve_within(&evening, &shift).unwrap();

        assert_eq!(w.start, date(2026, 3, 2).at(16, 0, 0, 0));
        assert_eq!(w.end, date(2026, 3, 3).at(9, 0, 0, 0));
    }

    #[test]
    fn recorded_start_date_is_not_moved() {
        let shift = resolve(&spec("2026-03-02", Some("09:00"), None, Some("09:00"))).unwrap();
        let early = spec("2026-03-02", Some("03:00"), None, Some("09:00"));

        let w = resolve_within(&early, &shift).unwrap();

        assert_eq!(w.start, date(2026, 3, 2).at(3, 0, 0, 0));
    }

    #[test]
    fn same_day_window_is_kept() {
        let w = resolve(&spec("2026-03-02", Some("12:00"), None, Some("16:00"))).unwrap();

        assert_eq!(w.start, date(2026, 3, 2).at(12, 0, 0, 0));
        assert_eq!(w.end, date(2026, 3, 2).at(16, 0, 0, 0));
    }

    #[test]
    fn explicit_end_date_is_respected() {
        let w = resolve(&spec(
            "2026-03-02",
            Some("09:00"),
            Some("2026-03-03"),
            Some("12:00"),
        ))
        .unwrap();

        assert_eq!(w.end, date(2026, 3, 3).at(12, 0, 0, 0));
    }

    #[test]
    fn unparseable_fields_yield_nothing() {
        assert!(resolve(&spec("2026-02-30", None, None, None)).is_none());
        assert!(resolve(&spec("yesterday", None, None, None)).is_none());
        assert!(resolve(&spec("2026-03-02", Some("25:00"), None, None)).is_none());
        assert!(resolve(&spec("2026-03-02", None, None, Some("noon"))).is_none());
    }

    #[test]
    fn missing_start_date_yields_nothing() {
        let spec = WindowSpec {
            start_time: Some("09:00".into()),
            ..WindowSpec::default()
        };
        assert!(resolve(&spec).is_none());
    }

    #[test]
    fn end_far_before_start_stays_degenerate() {
        let w = resolve(&spec(
            "2026-03-05",
            Some("09:00"),
            Some("2026-03-01"),
            Some("09:00"),
        ));
        assert!(w.is_none());
    }

    #[test]
    fn parses_time_variants() {
        assert_eq!(parse_time("09:00"), Some(civil::time(9, 0, 0, 0)));
        assert_eq!(parse_time("17:45:00"), Some(civil::time(17, 45, 0, 0)));
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn parses_datetime_variants() {
        let expected = date(2026, 3, 2).at(12, 0, 0, 0);
        assert_eq!(parse_datetime("2026-03-02T12:00"), Some(expected));
        assert_eq!(parse_datetime("2026-03-02 12:00"), Some(expected));
        assert_eq!(parse_datetime("12:00"), None);
    }

    #[test]
    fn to_spec_resolves_back_to_the_same_window() {
        let w = Window::new(date(2026, 3, 2).at(16, 0, 0, 0), date(2026, 3, 3).at(9, 0, 0, 0));
        assert_eq!(resolve(&w.to_spec()), Some(w));
    }

    #[test]
    fn overlap_and_containment() {
        let day = Window::new(date(2026, 3, 2).at(9, 0, 0, 0), date(2026, 3, 2).at(17, 0, 0, 0));
        let noon = Window::new(date(2026, 3, 2).at(12, 0, 0, 0), date(2026, 3, 2).at(13, 0, 0, 0));
        let evening =
            Window::new(date(2026, 3, 2).at(17, 0, 0, 0), date(2026, 3, 2).at(20, 0, 0, 0));

        assert!(day.overlaps(&noon));
        assert!(day.contains(&noon));
        assert!(!day.overlaps(&evening));
        assert!(!day.contains(&evening));
    }
}
