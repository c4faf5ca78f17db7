//! Shift types: the duty assignment being covered.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ActiveRequest, RequestType, WindowSpec};

/// A single duty assignment, usually a 24-hour cycle starting at 09:00.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,

    /// The person the shift belongs to.
    pub original_user_id: String,

    /// The shift's own window.
    pub window: WindowSpec,

    /// Status as stored. The status shown to people is derived by
    /// [`crate::coverage::summarize`].
    pub status: ShiftStatus,

    /// Explicit request type, when the backend recorded one.
    pub request_type: Option<RequestType>,

    /// Swap window recorded on the shift itself (`swap_start_time` and friends).
    pub swap_window: WindowSpec,

    /// The currently open request against this shift, if any.
    pub active_request: Option<ActiveRequest>,
}

impl Shift {
    /// A regular shift with no request against it.
    pub fn new(id: Uuid, original_user_id: impl Into<String>, window: WindowSpec) -> Self {
        Self {
            id,
            original_user_id: original_user_id.into(),
            window,
            status: ShiftStatus::Regular,
            request_type: None,
            swap_window: WindowSpec::default(),
            active_request: None,
        }
    }

    /// Whether a request is recorded against the shift, either as an
    /// active request or as swap times on the shift itself.
    pub fn has_request(&self) -> bool {
        self.active_request.is_some() || !self.swap_window.is_empty()
    }
}

/// Where a shift stands in the swap lifecycle, as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Regular,
    #[serde(alias = "requested")]
    SwapRequested,
    #[serde(alias = "partial")]
    PartiallyCovered,
    PendingApproval,
    Covered,
}

impl ShiftStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::SwapRequested => "swap_requested",
            Self::PartiallyCovered => "partially_covered",
            Self::PendingApproval => "pending_approval",
            Self::Covered => "covered",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "swap_requested" | "requested" => Ok(Self::SwapRequested),
            "partially_covered" | "partial" => Ok(Self::PartiallyCovered),
            "pending_approval" => Ok(Self::PendingApproval),
            "covered" => Ok(Self::Covered),
            _ => Err(format!("invalid shift status: {s}")),
        }
    }
}

/// The status shown for a shift, derived from its request and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Regular,
    Requested,
    Partial,
    PendingApproval,
    Covered,
}

impl DisplayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Requested => "requested",
            Self::Partial => "partial",
            Self::PendingApproval => "pending_approval",
            Self::Covered => "covered",
        }
    }
}

impl From<ShiftStatus> for DisplayStatus {
    fn from(status: ShiftStatus) -> Self {
        match status {
            ShiftStatus::Regular => Self::Regular,
            ShiftStatus::SwapRequested => Self::Requested,
            ShiftStatus::PartiallyCovered => Self::Partial,
            ShiftStatus::PendingApproval => Self::PendingApproval,
            ShiftStatus::Covered => Self::Covered,
        }
    }
}
