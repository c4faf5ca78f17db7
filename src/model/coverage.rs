//! Coverage entries: someone agreeing to staff part of a shift.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WindowSpec;

/// An offer or acceptance to cover part or all of a shift's requested window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageEntry {
    pub id: Uuid,

    /// The shift being covered. Unreferenced entries apply to whichever
    /// shift they are evaluated against.
    pub shift_id: Option<Uuid>,
    pub covering_user_id: Option<String>,
    pub covering_email: Option<String>,

    /// Covered window. Missing fields are filled from the shift's coverage window.
    pub window: WindowSpec,
    pub status: CoverageStatus,
    pub created_at: Option<Timestamp>,
}

impl CoverageEntry {
    /// Whether this entry counts toward coverage of `shift_id`.
    pub fn applies_to(&self, shift_id: Uuid) -> bool {
        self.shift_id.is_none_or(|id| id == shift_id)
    }

    /// Who is covering, for display.
    pub fn covering(&self) -> &str {
        self.covering_user_id
            .as_deref()
            .or(self.covering_email.as_deref())
            .unwrap_or("unknown")
    }
}

/// Review state of a coverage entry.
///
/// An unset status is pending, and pending entries count as coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl CoverageStatus {
    /// Whether the entry participates in gap computation.
    pub fn counts(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid coverage status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(shift_id: Option<Uuid>) -> CoverageEntry {
        CoverageEntry {
            id: Uuid::new_v4(),
            shift_id,
            covering_user_id: None,
            covering_email: Some("sam@example.com".into()),
            window: WindowSpec::default(),
            status: CoverageStatus::Pending,
            created_at: None,
        }
    }

    #[test]
    fn unreferenced_entries_apply_everywhere() {
        let shift = Uuid::new_v4();
        assert!(entry(None).applies_to(shift));
        assert!(entry(Some(shift)).applies_to(shift));
        assert!(!entry(Some(Uuid::new_v4())).applies_to(shift));
    }

    #[test]
    fn cancelled_and_rejected_do_not_count() {
        assert!(CoverageStatus::Pending.counts());
        assert!(CoverageStatus::Approved.counts());
        assert!(!CoverageStatus::Rejected.counts());
        assert!(!CoverageStatus::Cancelled.counts());
    }

    #[test]
    fn covering_falls_back_to_email() {
        assert_eq!(entry(None).covering(), "sam@example.com");
    }
}
