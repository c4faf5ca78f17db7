//! Roster lifecycle: requesting swaps, accepting coverage, cancelling.
//!
//! Each operation loads what it needs from [`Storage`], derives the current
//! coverage with [`summarize`], applies one transition and writes back.
//! Two people accepting overlapping coverage at the same moment are not
//! reconciled here; whichever write lands last wins.

use std::collections::{BTreeMap, HashMap};

use jiff::Timestamp;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::coverage::{CoverageSummary, summarize};
use crate::model::{
    ActiveRequest, CoverageEntry, CoverageStatus, DisplayStatus, RequestStatus, RequestType,
    Shift, ShiftStatus, WindowSpec,
};
use crate::record::Export;
use crate::selection::{self, CoverageChoice, SelectionError};
use crate::storage::{Storage, StorageError};
use crate::window;

/// Errors from roster operations.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("shift {0} already has an open request")]
    RequestAlreadyOpen(Uuid),

    #[error("shift {0} has no open request")]
    NoOpenRequest(Uuid),

    #[error("coverage entry {0} is already withdrawn")]
    AlreadyWithdrawn(Uuid),

    #[error("invalid request window: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = core::result::Result<T, RosterError>;

/// What the shift owner asks to have covered.
#[derive(Debug, Clone, Default)]
pub struct SwapRequest {
    /// Explicit type. When absent, a request smaller than the shift is partial.
    pub request_type: Option<RequestType>,

    /// The window to cover. Missing fields fall back to the shift.
    pub window: WindowSpec,
}

/// The outcome of accepting coverage.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Acceptance {
    pub entry: CoverageEntry,
    pub summary: CoverageSummary,
}

/// Roster-wide numbers for the KPI dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub shifts: usize,
    pub by_status: BTreeMap<DisplayStatus, usize>,
    pub open_requests: usize,

    /// Minutes across open requests that need covering.
    pub requested_minutes: i64,

    /// Of those, minutes already covered.
    pub covered_minutes: i64,
    pub skipped: usize,
}

/// Open a swap request against a shift.
pub fn request_swap(
    storage: &Storage,
    shift_id: Uuid,
    request: &SwapRequest,
    now: Timestamp,
) -> Result<Shift> {
    let mut shift = storage.load_shift(shift_id)?;
    if shift.active_request.as_ref().is_some_and(ActiveRequest::is_open) {
        return Err(RosterError::RequestAlreadyOpen(shift_id));
    }

    let shift_window = window::resolve(&shift.window)
        .ok_or_else(|| RosterError::InvalidWindow("the shift's own window does not resolve".into()))?;
    let requested = if request.window.is_empty() {
        shift_window
    } else {
        window::resolve_within(&request.window, &shift_window)
            .ok_or_else(|| RosterError::InvalidWindow("the requested window does not resolve".into()))?
    };
    if !shift_window.contains(&requested) {
        return Err(RosterError::InvalidWindow(
            "the requested window must lie within the shift".into(),
        ));
    }

    let request_type = request.request_type.unwrap_or(if requested == shift_window {
        RequestType::Full
    } else {
        RequestType::Partial
    });

    let spec = requested.to_spec();
    shift.status = match request_type {
        RequestType::Full => ShiftStatus::SwapRequested,
        RequestType::Partial => ShiftStatus::PartiallyCovered,
    };
    shift.request_type = Some(request_type);
    shift.swap_window = spec.clone();
    shift.active_request = Some(ActiveRequest {
        id: Uuid::new_v4(),
        request_type: Some(request_type),
        status: RequestStatus::SwapRequested,
        window: spec,
        requested_at: Some(now),
    });
    storage.update_shift(&shift)?;

    info!(shift = %shift.id, %request_type, "swap requested");
    Ok(shift)
}

/// Accept coverage of an open request on behalf of `covering`.
///
/// `covering` is a user id, or an email address when it contains `@`.
/// The request closes once its window is fully covered.
pub fn accept_coverage(
    storage: &Storage,
    shift_id: Uuid,
    covering: &str,
    choice: CoverageChoice,
    now: Timestamp,
) -> Result<Acceptance> {
    let mut shift = storage.load_shift(shift_id)?;
    if !shift.active_request.as_ref().is_some_and(ActiveRequest::is_open) {
        return Err(RosterError::NoOpenRequest(shift_id));
    }

    let mut entries = storage.list_coverage(shift_id)?;
    let before = summarize(&shift, &entries);
    let window = selection::select(&before, choice)?;

    let (covering_user_id, covering_email) = if covering.contains('@') {
        (None, Some(covering.to_string()))
    } else {
        (Some(covering.to_string()), None)
    };
    let entry = CoverageEntry {
        id: Uuid::new_v4(),
        shift_id: Some(shift_id),
        covering_user_id,
        covering_email,
        window: window.to_spec(),
        status: CoverageStatus::Approved,
        created_at: Some(now),
    };
    storage.create_coverage(&entry)?;
    entries.push(entry.clone());

    let summary = summarize(&shift, &entries);
    let request_status = if summary.is_fully_covered {
        shift.status = ShiftStatus::Covered;
        RequestStatus::Closed
    } else {
        shift.status = ShiftStatus::PartiallyCovered;
        RequestStatus::PartiallyCovered
    };
    if let Some(request) = shift.active_request.as_mut() {
        request.status = request_status;
    }
    storage.update_shift(&shift)?;

    info!(
        shift = %shift_id,
        entry = %entry.id,
        covering,
        remaining = summary.missing_segments.len(),
        "coverage accepted"
    );
    let summary = summarize(&shift, &entries);
    Ok(Acceptance { entry, summary })
}

/// Cancel the request against a shift, withdrawing its coverage.
///
/// The shift returns to `regular` with every request field cleared.
pub fn cancel_request(storage: &Storage, shift_id: Uuid) -> Result<Shift> {
    let mut shift = storage.load_shift(shift_id)?;
    if !shift.has_request() {
        return Err(RosterError::NoOpenRequest(shift_id));
    }

    let mut withdrawn = 0;
    for mut entry in storage.list_coverage(shift_id)? {
        if entry.status.counts() {
            entry.status = CoverageStatus::Cancelled;
            storage.update_coverage(&entry)?;
            withdrawn += 1;
        }
    }

    shift.status = ShiftStatus::Regular;
    shift.request_type = None;
    shift.swap_window = WindowSpec::default();
    shift.active_request = None;
    storage.update_shift(&shift)?;

    info!(shift = %shift_id, withdrawn, "request cancelled");
    Ok(shift)
}

/// Withdraw one coverage entry, reopening its request if the shift is no
/// longer fully covered.
pub fn withdraw_coverage(storage: &Storage, coverage_id: Uuid) -> Result<Option<CoverageSummary>> {
    let mut entry = storage.load_coverage(coverage_id)?;
    if !entry.status.counts() {
        return Err(RosterError::AlreadyWithdrawn(coverage_id));
    }
    entry.status = CoverageStatus::Cancelled;
    storage.update_coverage(&entry)?;
    info!(entry = %coverage_id, "coverage withdrawn");

    let Some(shift_id) = entry.shift_id else {
        return Ok(None);
    };
    let mut shift = storage.load_shift(shift_id)?;
    let entries = storage.list_coverage(shift_id)?;
    let summary = summarize(&shift, &entries);

    if !summary.is_fully_covered
        && let Some(request) = shift.active_request.as_mut()
        && request.status != RequestStatus::Cancelled
    {
        (request.status, shift.status) = if summary.approved_count > 0 {
            (RequestStatus::PartiallyCovered, ShiftStatus::PartiallyCovered)
        } else if summary.request_type == RequestType::Partial {
            (RequestStatus::SwapRequested, ShiftStatus::PartiallyCovered)
        } else {
            (RequestStatus::SwapRequested, ShiftStatus::SwapRequested)
        };
        storage.update_shift(&shift)?;
        info!(shift = %shift_id, "request reopened");
    }

    Ok(Some(summarize(&shift, &entries)))
}

/// What an import wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub shifts: usize,
    pub coverage: usize,

    /// Coverage records that name no shift. They are not stored: a roster
    /// entry always belongs to one shift.
    pub unreferenced: usize,
}

/// Write a backend export into the roster, overwriting records that are
/// already there.
pub fn import(storage: &Storage, export: Export) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for record in export.shifts {
        let shift = record.into_shift();
        if storage.shift_exists(shift.id)? {
            storage.update_shift(&shift)?;
        } else {
            storage.create_shift(&shift)?;
        }
        report.shifts += 1;
    }

    for record in export.coverage {
        let entry = record.into_coverage();
        if entry.shift_id.is_none() {
            warn!(entry = %entry.id, "skipping coverage record without a shift");
            report.unreferenced += 1;
            continue;
        }
        match storage.update_coverage(&entry) {
            Err(StorageError::CoverageNotFound(_)) => storage.create_coverage(&entry)?,
            other => other?,
        }
        report.coverage += 1;
    }

    info!(
        shifts = report.shifts,
        coverage = report.coverage,
        unreferenced = report.unreferenced,
        "import finished"
    );
    Ok(report)
}

/// Every shift with its coverage summary, earliest first.
pub fn overview(storage: &Storage) -> Result<Vec<(Shift, CoverageSummary)>> {
    let shifts = storage.list_shifts()?;
    let mut by_shift: HashMap<Uuid, Vec<CoverageEntry>> = HashMap::new();
    for entry in storage.list_all_coverage()? {
        if let Some(shift_id) = entry.shift_id {
            by_shift.entry(shift_id).or_default().push(entry);
        }
    }

    Ok(shifts
        .into_iter()
        .map(|shift| {
            let entries = by_shift.remove(&shift.id).unwrap_or_default();
            let summary = summarize(&shift, &entries);
            (shift, summary)
        })
        .collect())
}

/// Aggregate numbers across the roster.
pub fn stats(storage: &Storage) -> Result<RosterStats> {
    let mut stats = RosterStats::default();
    for (shift, summary) in overview(storage)? {
        stats.shifts += 1;
        *stats.by_status.entry(summary.status).or_default() += 1;
        stats.skipped += summary.skipped;
        if shift.active_request.as_ref().is_some_and(ActiveRequest::is_open) {
            stats.open_requests += 1;
            stats.requested_minutes += summary.total_minutes;
            stats.covered_minutes += summary.covered_minutes;
        }
    }
    Ok(stats)
}
