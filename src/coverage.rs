//! Coverage classification: how much of a shift's requested window is staffed.
//!
//! [`summarize`] is a pure derivation over a shift and its coverage entries.
//! It decides the request type, the window that needs covering, the gaps
//! that remain, and the status to show for the shift.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::gaps;
use crate::model::{
    CoverageEntry, DisplayStatus, RequestStatus, RequestType, Shift, ShiftStatus, WindowSpec,
    present,
};
use crate::window::{self, Window};

/// Everything derived about a shift's coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub shift_id: Uuid,
    pub request_type: RequestType,

    /// The window that needs covering. `None` when the recorded window
    /// could not be resolved.
    pub coverage_window: Option<Window>,

    /// Uncovered parts of the coverage window, sorted and disjoint.
    pub missing_segments: Vec<Window>,

    /// Covered parts of the coverage window, merged.
    pub covered_segments: Vec<Window>,

    /// Counting entries whose window resolved.
    pub approved_count: usize,
    pub is_fully_covered: bool,
    pub status: DisplayStatus,

    /// Counting entries that were excluded because their window did not
    /// resolve or was degenerate.
    pub skipped: usize,
    pub total_minutes: i64,
    pub covered_minutes: i64,
}

impl CoverageSummary {
    /// Share of the coverage window that is staffed, from 0.0 to 1.0.
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total_minutes == 0 {
            return 0.0;
        }
        self.covered_minutes as f64 / self.total_minutes as f64
    }
}

/// Derive the coverage summary of `shift` from `entries`.
///
/// Entries referencing another shift are ignored, unreferenced entries are
/// assumed to belong to `shift`. Only pending and approved entries count.
pub fn summarize(shift: &Shift, entries: &[CoverageEntry]) -> CoverageSummary {
    let request_type = request_type(shift);
    let coverage_window = resolve_coverage_window(shift, request_type);

    let mut skipped = 0;
    let mut covers = Vec::new();
    for entry in entries
        .iter()
        .filter(|e| e.applies_to(shift.id) && e.status.counts())
    {
        // An entry with no window at all covers the whole coverage window.
        let resolved = match &coverage_window {
            Some(base) if entry.window.is_empty() => Some(*base),
            Some(base) => window::resolve_within(&entry.window, base),
            None => None,
        };
        match resolved {
            Some(w) => covers.push(w),
            None => {
                debug!(shift = %shift.id, entry = %entry.id, "skipping coverage entry with unresolvable window");
                skipped += 1;
            }
        }
    }
    let approved_count = covers.len();

    let (missing_segments, covered_segments) = match &coverage_window {
        Some(base) => {
            let report = gaps::missing_segments(base, &covers);
            skipped += report.skipped;
            (report.segments, gaps::covered_within(base, &covers))
        }
        None => (Vec::new(), Vec::new()),
    };

    let is_fully_covered =
        coverage_window.is_some() && approved_count > 0 && missing_segments.is_empty();
    let status = display_status(shift, request_type, is_fully_covered, approved_count);

    CoverageSummary {
        shift_id: shift.id,
        request_type,
        coverage_window,
        total_minutes: coverage_window.as_ref().map_or(0, Window::minutes),
        covered_minutes: gaps::total_minutes(&covered_segments),
        missing_segments,
        covered_segments,
        approved_count,
        is_fully_covered,
        status,
        skipped,
    }
}

/// Partial when the request or shift says so, or when the request's start
/// and end times differ. A full request on a 24-hour shift runs `09:00` to
/// `09:00`, so differing times mean only part of the shift is offered.
pub fn request_type(shift: &Shift) -> RequestType {
    let explicit = shift
        .active_request
        .as_ref()
        .and_then(|r| r.request_type)
        .or(shift.request_type);
    if explicit == Some(RequestType::Partial) {
        return RequestType::Partial;
    }

    let times = request_window_spec(shift);
    match (present(&times.start_time), present(&times.end_time)) {
        (Some(start), Some(end)) if window::parse_time(start) != window::parse_time(end) => {
            RequestType::Partial
        }
        _ => RequestType::Full,
    }
}

/// The recorded window that needs covering.
///
/// The request's window when a request exists or the type is partial,
/// otherwise the shift's own window. A request that names its own times
/// takes only the start date from the shift; its end date defaults to its
/// start date.
pub fn coverage_window_spec(shift: &Shift, request_type: RequestType) -> WindowSpec {
    if !shift.has_request() && request_type == RequestType::Full {
        return shift.window.clone();
    }
    let request = request_window_spec(shift);
    if request.is_empty() {
        return shift.window.clone();
    }
    request.or(&WindowSpec {
        end_date: None,
        ..shift.window.clone()
    })
}

/// The coverage window, with request times placed inside the shift.
fn resolve_coverage_window(shift: &Shift, request_type: RequestType) -> Option<Window> {
    let spec = coverage_window_spec(shift, request_type);
    match window::resolve(&shift.window) {
        Some(shift_window) if spec != shift.window => {
            window::resolve_within(&request_window_spec(shift), &shift_window)
        }
        _ => window::resolve(&spec),
    }
}

/// Request fields only: the active request first, then the swap fields on the shift.
fn request_window_spec(shift: &Shift) -> WindowSpec {
    match &shift.active_request {
        Some(request) => request.window.or(&shift.swap_window),
        None => shift.swap_window.clone(),
    }
}

/// Status precedence, highest first: a closed request, full coverage, a
/// partial request, an open request, then the stored status.
fn display_status(
    shift: &Shift,
    request_type: RequestType,
    is_fully_covered: bool,
    approved_count: usize,
) -> DisplayStatus {
    let request_status = shift.active_request.as_ref().map(|r| r.status);

    if request_status == Some(RequestStatus::Closed) || is_fully_covered {
        return DisplayStatus::Covered;
    }
    if request_status == Some(RequestStatus::PartiallyCovered)
        || request_type == RequestType::Partial
    {
        return DisplayStatus::Partial;
    }
    if matches!(
        request_status,
        Some(RequestStatus::Open | RequestStatus::SwapRequested)
    ) {
        return DisplayStatus::Requested;
    }

    if approved_count > 0 && shift.status == ShiftStatus::Regular {
        return DisplayStatus::Requested;
    }
    shift.status.into()
}
