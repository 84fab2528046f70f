use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// One check-in, optionally closed by a check-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: u64,
    pub user_id: u64,
    /// Day the session counts towards (the check-in date)
    pub date: NaiveDate,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Time between check-in and check-out. Open sessions and check-outs
    /// recorded before their check-in count as nothing.
    pub fn worked(&self) -> TimeDelta {
        match self.check_out {
            Some(out) if out > self.check_in => out.signed_duration_since(self.check_in),
            _ => TimeDelta::zero(),
        }
    }
}

/// Daily status of a user. Every variant except `Active` is a finalized value
/// that may be stored; `Active` only describes a day still in progress.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
    IntoStaticStr,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    PresentDespiteLeave,
    HalfDay,
    HalfDayDespiteLeave,
    OnLeave,
    Absent,
    Active,
}

impl AttendanceStatus {
    /// Code stored in `daily_attendance.status`
    pub fn code(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::PresentDespiteLeave => "Present (Despite Leave)",
            AttendanceStatus::HalfDay => "Half Day",
            AttendanceStatus::HalfDayDespiteLeave => "Half Day (Despite Leave)",
            AttendanceStatus::OnLeave => "On Leave",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Active => "Active",
        }
    }

    pub fn is_final(self) -> bool {
        self != AttendanceStatus::Active
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Finalized status as persisted for a (user, date) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredStatus {
    pub status: AttendanceStatus,
    pub worked: TimeDelta,
}

/// Raw `daily_attendance` row.
#[derive(Debug, sqlx::FromRow)]
pub struct DailyAttendanceRow {
    pub status: String,
    pub worked_seconds: i64,
}
