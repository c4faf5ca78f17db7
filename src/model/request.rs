//! Request types: the open swap/coverage request against a shift.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WindowSpec;

/// The currently open request against a shift.
///
/// When present, its window overrides the shift's own window for gap
/// computation and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRequest {
    pub id: Uuid,
    pub request_type: Option<RequestType>,
    pub status: RequestStatus,

    /// The window that needs covering. Missing fields fall back to the shift.
    pub window: WindowSpec,
    pub requested_at: Option<Timestamp>,
}

impl ActiveRequest {
    /// Whether the request still accepts coverage.
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            RequestStatus::Open | RequestStatus::SwapRequested | RequestStatus::PartiallyCovered
        )
    }
}

/// Whether the entire shift or only part of it needs covering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Full,
    Partial,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "partial" => Ok(Self::Partial),
            _ => Err(format!("invalid request type: {s}")),
        }
    }
}

/// Lifecycle of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Open,
    #[serde(rename = "Swap_Requested")]
    SwapRequested,
    #[serde(rename = "Partially_Covered")]
    PartiallyCovered,
    Closed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::SwapRequested => "Swap_Requested",
            Self::PartiallyCovered => "Partially_Covered",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "pending" => Ok(Self::Open),
            "swap_requested" | "requested" => Ok(Self::SwapRequested),
            "partially_covered" | "partial" => Ok(Self::PartiallyCovered),
            "closed" => Ok(Self::Closed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid request status: {s}")),
        }
    }
}
