//! Backend records: raw shapes with legacy field names, and the adapter
//! that folds them into the canonical model.
//!
//! The backend grew several names for the same concept over time (a
//! coverage start date may be `cover_start_date`, `start_date` or
//! `coverDate`). Each alias is kept as its own optional field here and
//! resolved once, in a fixed order, by the `into_*` conversions.

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::model::{
    ActiveRequest, CoverageEntry, CoverageStatus, RequestStatus, Shift, ShiftStatus, WindowSpec,
    present,
};

/// A record id as the backend stores it: usually a string, sometimes a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl RecordId {
    /// The canonical id. Foreign ids that are not UUIDs map to a stable
    /// name-based UUID, so a record keeps its id across imports.
    pub fn to_uuid(&self) -> Uuid {
        match self {
            Self::Text(s) => s
                .trim()
                .parse()
                .unwrap_or_else(|_| Uuid::new_v5(&Uuid::NAMESPACE_OID, s.trim().as_bytes())),
            Self::Number(n) => Uuid::new_v5(&Uuid::NAMESPACE_OID, n.to_string().as_bytes()),
        }
    }
}

/// A shift as the backend stores it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShiftRecord {
    pub id: Option<RecordId>,
    pub original_user_id: Option<String>,
    pub user_id: Option<String>,
    pub assigned_to: Option<String>,
    pub start_date: Option<String>,
    pub date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub request_type: Option<String>,
    pub swap_start_date: Option<String>,
    pub swap_start_time: Option<String>,
    pub swap_end_date: Option<String>,
    pub swap_end_time: Option<String>,
    pub active_request: Option<RequestRecord>,
}

/// A swap/coverage request as the backend stores it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestRecord {
    pub id: Option<RecordId>,
    pub request_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub req_start_date: Option<String>,
    pub start_time: Option<String>,
    pub req_start_time: Option<String>,
    pub end_date: Option<String>,
    pub req_end_date: Option<String>,
    pub end_time: Option<String>,
    pub req_end_time: Option<String>,
}

/// A coverage entry as the backend stores it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageRecord {
    pub id: Option<RecordId>,
    pub shift_id: Option<RecordId>,
    pub covering_user_id: Option<String>,
    pub covering_email: Option<String>,
    pub cover_start_date: Option<String>,
    pub start_date: Option<String>,
    #[serde(rename = "coverDate")]
    pub cover_date: Option<String>,
    pub cover_start_time: Option<String>,
    pub start_time: Option<String>,
    pub cover_end_date: Option<String>,
    pub end_date: Option<String>,
    pub cover_end_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
}

/// One shift with its coverage, as read by `summarize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftDocument {
    pub shift: ShiftRecord,
    #[serde(default)]
    pub coverage: Vec<CoverageRecord>,
}

/// A backend export, as read by `import`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
    #[serde(default)]
    pub coverage: Vec<CoverageRecord>,
}

impl ShiftRecord {
    /// Fold the record into the canonical shift.
    ///
    /// An unrecognized status falls back to `regular`.
    pub fn into_shift(self) -> Shift {
        let id = self.id.as_ref().map_or_else(Uuid::new_v4, RecordId::to_uuid);
        let status = parse_or_default(self.status.as_deref(), id, "shift status");

        Shift {
            id,
            original_user_id: first([&self.original_user_id, &self.user_id, &self.assigned_to])
                .unwrap_or_default(),
            window: WindowSpec {
                start_date: first([&self.start_date, &self.date]),
                start_time: first([&self.start_time]),
                end_date: first([&self.end_date]),
                end_time: first([&self.end_time]),
            },
            status: status.unwrap_or(ShiftStatus::Regular),
            request_type: present(&self.request_type).and_then(|s| s.parse().ok()),
            swap_window: WindowSpec {
                start_date: first([&self.swap_start_date]),
                start_time: first([&self.swap_start_time]),
                end_date: first([&self.swap_end_date]),
                end_time: first([&self.swap_end_time]),
            },
            active_request: self.active_request.map(RequestRecord::into_request),
        }
    }
}

impl RequestRecord {
    /// Fold the record into the canonical request.
    ///
    /// An unrecognized status is treated as open.
    pub fn into_request(self) -> ActiveRequest {
        let id = self.id.as_ref().map_or_else(Uuid::new_v4, RecordId::to_uuid);
        let status = parse_or_default(self.status.as_deref(), id, "request status");

        ActiveRequest {
            id,
            request_type: first([&self.request_type, &self.kind]).and_then(|s| s.parse().ok()),
            status: status.unwrap_or(RequestStatus::Open),
            window: WindowSpec {
                start_date: first([&self.start_date, &self.req_start_date]),
                start_time: first([&self.start_time, &self.req_start_time]),
                end_date: first([&self.end_date, &self.req_end_date]),
                end_time: first([&self.end_time, &self.req_end_time]),
            },
            requested_at: None,
        }
    }
}

impl CoverageRecord {
    /// Fold the record into the canonical coverage entry.
    ///
    /// An unrecognized status is treated as pending.
    pub fn into_coverage(self) -> CoverageEntry {
        let id = self.id.as_ref().map_or_else(Uuid::new_v4, RecordId::to_uuid);
        let status = parse_or_default(self.status.as_deref(), id, "coverage status");

        CoverageEntry {
            id,
            shift_id: self.shift_id.as_ref().map(RecordId::to_uuid),
            covering_user_id: first([&self.covering_user_id]),
            covering_email: first([&self.covering_email]),
            window: WindowSpec {
                start_date: first([&self.cover_start_date, &self.start_date, &self.cover_date]),
                start_time: first([&self.cover_start_time, &self.start_time]),
                end_date: first([&self.cover_end_date, &self.end_date]),
                end_time: first([&self.cover_end_time, &self.end_time]),
            },
            status: status.unwrap_or(CoverageStatus::Pending),
            created_at: None,
        }
    }
}

/// The first alias that carries a value.
fn first<const N: usize>(aliases: [&Option<String>; N]) -> Option<String> {
    aliases.into_iter().find_map(present).map(String::from)
}

fn parse_or_default<T: std::str::FromStr<Err = String>>(
    raw: Option<&str>,
    id: Uuid,
    what: &str,
) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(record = %id, "unrecognized {what}, using default: {e}");
            None
        }
    }
}
