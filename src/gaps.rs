//! Gap calculation: the parts of a window nobody has covered yet.
//!
//! Coverage arrives as arbitrary, possibly overlapping windows. The gaps are
//! the base window minus the union of those windows, computed by splitting a
//! list of open segments as each cover is applied in start order.

use serde::Serialize;

use crate::window::Window;

/// Uncovered segments of a base window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    /// Pairwise disjoint, sorted by start.
    pub segments: Vec<Window>,

    /// Covers dropped because they were degenerate (`start >= end`).
    pub skipped: usize,
}

/// Subtract `covers` from `base`.
///
/// Returns no segments when `base` itself is degenerate. Degenerate covers
/// are dropped and counted in [`GapReport::skipped`].
pub fn missing_segments(base: &Window, covers: &[Window]) -> GapReport {
    let (mut valid, degenerate): (Vec<Window>, Vec<Window>) =
        covers.iter().copied().partition(|c| !c.is_empty());
    let skipped = degenerate.len();

    if base.is_empty() {
        return GapReport {
            segments: Vec::new(),
            skipped,
        };
    }

    valid.sort_by_key(|c| c.start);

    let mut open = vec![*base];
    for cover in &valid {
        open = open
            .into_iter()
            .flat_map(|segment| subtract(segment, cover))
            .collect();
    }
    open.retain(|s| !s.is_empty());

    GapReport {
        segments: open,
        skipped,
    }
}

/// What remains of `segment` once `cover` is taken out: the part before it
/// and the part after it, either of which may be absent.
fn subtract(segment: Window, cover: &Window) -> impl Iterator<Item = Window> {
    if !segment.overlaps(cover) {
        return [Some(segment), None].into_iter().flatten();
    }
    let before = (segment.start < cover.start).then(|| Window::new(segment.start, cover.start));
    let after = (cover.end < segment.end).then(|| Window::new(cover.end, segment.end));
    [before, after].into_iter().flatten()
}

/// Union of `windows`: sorted, with overlapping or touching windows joined.
///
/// Degenerate windows are ignored.
pub fn merge(windows: &[Window]) -> Vec<Window> {
    let mut sorted: Vec<Window> = windows.iter().copied().filter(|w| !w.is_empty()).collect();
    sorted.sort_by_key(|w| w.start);

    let mut merged: Vec<Window> = Vec::with_capacity(sorted.len());
    for window in sorted {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => {
                last.end = last.end.max(window.end);
            }
            _ => merged.push(window),
        }
    }
    merged
}

/// The covered part of `base`: the union of `covers`, clipped to `base`.
pub fn covered_within(base: &Window, covers: &[Window]) -> Vec<Window> {
    merge(covers)
        .into_iter()
        .map(|w| Window::new(w.start.max(base.start), w.end.min(base.end)))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Total minutes across `windows`.
pub fn total_minutes(windows: &[Window]) -> i64 {
    windows.iter().map(Window::minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::{DateTime, date};

    /// Monday 2026-03-02 at `hour`.
    fn mon(hour: i8) -> DateTime {
        date(2026, 3, 2).at(hour, 0, 0, 0)
    }

    /// Tuesday 2026-03-03 at `hour`.
    fn tue(hour: i8) -> DateTime {
        date(2026, 3, 3).at(hour, 0, 0, 0)
    }

    fn w(start: DateTime, end: DateTime) -> Window {
        Window::new(start, end)
    }

    /// Disjoint and sorted by start.
    fn assert_well_formed(segments: &[Window]) {
        for pair in segments.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{segments:?}");
        }
        assert!(segments.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn midday_cover_leaves_two_gaps() {
        let base = w(mon(9), tue(9));
        let report = missing_segments(&base, &[w(mon(12), mon(16))]);

        assert_eq!(report.segments, vec![w(mon(9), mon(12)), w(mon(16), tue(9))]);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn full_cover_leaves_nothing() {
        let base = w(mon(9), tue(9));
        let report = missing_segments(&base, &[w(mon(9), tue(9))]);

        assert!(report.segments.is_empty());
    }

    #[test]
    fn overlapping_covers_merge() {
        let base = w(mon(9), mon(20));
        let report = missing_segments(&base, &[w(mon(12), mon(18)), w(mon(10), mon(14))]);

        assert_eq!(report.segments, vec![w(mon(9), mon(10)), w(mon(18), mon(20))]);
    }

    #[test]
    fn no_covers_returns_the_base() {
        let base = w(mon(9), tue(9));
        let report = missing_segments(&base, &[]);

        assert_eq!(report.segments, vec![base]);
    }

    #[test]
    fn degenerate_base_returns_nothing() {
        let report = missing_segments(&w(mon(12), mon(12)), &[]);
        assert!(report.segments.is_empty());

        let report = missing_segments(&w(mon(14), mon(12)), &[w(mon(12), mon(13))]);
        assert!(report.segments.is_empty());
    }

    #[test]
    fn degenerate_covers_are_skipped_and_counted() {
        let base = w(mon(9), mon(17));
        let report = missing_segments(&base, &[w(mon(12), mon(12)), w(mon(15), mon(11))]);

        assert_eq!(report.segments, vec![base]);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn covers_outside_the_base_are_ignored() {
        let base = w(mon(9), mon(17));
        let report = missing_segments(&base, &[w(mon(6), mon(9)), w(mon(17), mon(20))]);

        assert_eq!(report.segments, vec![base]);
    }

    #[test]
    fn covers_spilling_past_the_edges_are_clipped() {
        let base = w(mon(9), mon(17));
        let report = missing_segments(&base, &[w(mon(6), mon(10)), w(mon(16), mon(20))]);

        assert_eq!(report.segments, vec![w(mon(10), mon(16))]);
    }

    #[test]
    fn several_disjoint_covers_produce_sorted_gaps() {
        let base = w(mon(9), tue(9));
        let covers = [
            w(mon(20), mon(22)),
            w(mon(10), mon(11)),
            w(mon(15), mon(16)),
        ];
        let report = missing_segments(&base, &covers);

        assert_eq!(
            report.segments,
            vec![
                w(mon(9), mon(10)),
                w(mon(11), mon(15)),
                w(mon(16), mon(20)),
                w(mon(22), tue(9)),
            ]
        );
        assert_well_formed(&report.segments);
    }

    #[test]
    fn gaps_and_covers_reconstruct_the_base() {
        let base = w(mon(9), tue(9));
        let covers = [w(mon(13), mon(15)), w(mon(9), mon(11)), w(tue(3), tue(9))];
        let report = missing_segments(&base, &covers);
        assert_well_formed(&report.segments);

        let mut pieces: Vec<Window> = report.segments.clone();
        pieces.extend(covers);

        assert_eq!(merge(&pieces), vec![base]);
        assert_eq!(
            total_minutes(&report.segments) + total_minutes(&covers),
            base.minutes()
        );
    }

    #[test]
    fn feeding_gaps_back_is_idempotent() {
        let base = w(mon(9), tue(9));
        let report = missing_segments(&base, &[w(mon(12), mon(16)), w(mon(18), mon(19))]);

        let again: Vec<Window> = report
            .segments
            .iter()
            .flat_map(|gap| missing_segments(gap, &[]).segments)
            .collect();

        assert_eq!(again, report.segments);
    }

    #[test]
    fn merge_joins_touching_windows() {
        let merged = merge(&[w(mon(12), mon(14)), w(mon(9), mon(12)), w(mon(15), mon(16))]);
        assert_eq!(merged, vec![w(mon(9), mon(14)), w(mon(15), mon(16))]);
    }

    #[test]
    fn covered_within_clips_to_base() {
        let base = w(mon(9), mon(17));
        let covered = covered_within(&base, &[w(mon(6), mon(10)), w(mon(16), mon(20))]);

        assert_eq!(covered, vec![w(mon(9), mon(10)), w(mon(16), mon(17))]);
        assert_eq!(total_minutes(&covered), 120);
    }
}
