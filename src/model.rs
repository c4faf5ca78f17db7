//! Core data model for shiftcover.
//!
//! These types are the canonical schema every other module works with:
//! shifts, the active request against a shift, and coverage entries.
//! Legacy backend field names never reach this far; they are folded into
//! these types by [`crate::record`].

mod coverage;
mod request;
mod shift;

use serde::{Deserialize, Serialize};

pub use coverage::{CoverageEntry, CoverageStatus};
pub use request::{ActiveRequest, RequestStatus, RequestType};
pub use shift::{DisplayStatus, Shift, ShiftStatus};

/// A time window as it was recorded: independently optional date and time strings.
///
/// Nothing here is parsed yet. Resolution into definite instants happens in
/// [`crate::window::resolve`], which is where defaults and the overnight
/// rollover are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    /// `YYYY-MM-DD`.
    pub start_date: Option<String>,

    /// `HH:mm`.
    pub start_time: Option<String>,

    /// `YYYY-MM-DD`. Defaults to the start date.
    pub end_date: Option<String>,

    /// `HH:mm`.
    pub end_time: Option<String>,
}

impl WindowSpec {
    /// Fill every missing field from `fallback`.
    ///
    /// Blank strings count as missing.
    #[must_use]
    pub fn or(&self, fallback: &WindowSpec) -> WindowSpec {
        WindowSpec {
            start_date: pick(&self.start_date, &fallback.start_date),
            start_time: pick(&self.start_time, &fallback.start_time),
            end_date: pick(&self.end_date, &fallback.end_date),
            end_time: pick(&self.end_time, &fallback.end_time),
        }
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        [
            &self.start_date,
            &self.start_time,
            &self.end_date,
            &self.end_time,
        ]
        .into_iter()
        .all(|f| present(f).is_none())
    }
}

/// The field's value, unless it is absent or blank.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn pick(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    present(primary).or_else(|| present(fallback)).map(String::from)
}
