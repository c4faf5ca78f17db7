//! Segment selection: validating a new coverage window before it is stored.
//!
//! Partial coverage must sit inside one uncovered gap, so the same stretch
//! of a shift is never booked twice. Full coverage always takes the whole
//! coverage window.

use jiff::{ToSpan, civil::DateTime};

use crate::coverage::CoverageSummary;
use crate::window::Window;

/// Step used for picker times when none is configured.
pub const DEFAULT_STEP_MINUTES: i64 = 30;

/// What a person offers to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageChoice {
    /// The entire coverage window.
    Full,

    /// A window inside one of the gaps.
    Partial(Window),
}

/// Why a coverage choice was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("the shift has no valid window to cover")]
    NoCoverageWindow,

    #[error("the shift is already fully covered")]
    AlreadyCovered,

    #[error("end {end} must be after start {start}")]
    EndNotAfterStart { start: DateTime, end: DateTime },

    #[error("{start} to {end} is not inside an uncovered gap")]
    OutsideGap { start: DateTime, end: DateTime },
}

/// Validate `choice` against `summary` and return the window to store.
pub fn select(summary: &CoverageSummary, choice: CoverageChoice) -> Result<Window, SelectionError> {
    let window = summary
        .coverage_window
        .ok_or(SelectionError::NoCoverageWindow)?;
    if summary.missing_segments.is_empty() {
        return Err(SelectionError::AlreadyCovered);
    }

    match choice {
        CoverageChoice::Full => Ok(window),
        CoverageChoice::Partial(selected) => {
            if selected.end <= selected.start {
                return Err(SelectionError::EndNotAfterStart {
                    start: selected.start,
                    end: selected.end,
                });
            }
            if containing_gap(&summary.missing_segments, &selected).is_none() {
                return Err(SelectionError::OutsideGap {
                    start: selected.start,
                    end: selected.end,
                });
            }
            Ok(selected)
        }
    }
}

/// The gap that fully contains `selected`, if any.
pub fn containing_gap<'a>(gaps: &'a [Window], selected: &Window) -> Option<&'a Window> {
    gaps.iter().find(|gap| gap.contains(selected))
}

/// Times a picker may offer inside `gap`: every `step_minutes` from the
/// start, always ending with the gap's own end.
///
/// A non-positive step offers only the two edges.
pub fn selectable_times(gap: &Window, step_minutes: i64) -> Vec<DateTime> {
    if gap.is_empty() {
        return Vec::new();
    }

    let mut times = vec![gap.start];
    if step_minutes > 0 {
        let mut next = gap.start;
        while let Ok(t) = next.checked_add(step_minutes.minutes()) {
            if t >= gap.end {
                break;
            }
            times.push(t);
            next = t;
        }
    }
    times.push(gap.end);
    times
}
