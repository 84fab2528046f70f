use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A leave request row covering `start_date..=end_date`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub user_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub status: String,
}

/// Leave situation of a user on one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    None,
    Pending,
    Approved,
}

impl LeaveStatus {
    /// Folds the statuses of every request covering a date. An approved
    /// request wins; rejected or unknown ones are ignored.
    pub fn from_request_statuses<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        statuses
            .into_iter()
            .fold(LeaveStatus::None, |acc, status| {
                match status.trim().to_ascii_lowercase().as_str() {
                    "approved" => LeaveStatus::Approved,
                    "pending" if acc == LeaveStatus::None => LeaveStatus::Pending,
                    _ => acc,
                }
            })
    }

    /// Leave status on a date, given the requests that cover it.
    pub fn from_requests(requests: &[LeaveRequest]) -> Self {
        Self::from_request_statuses(requests.iter().map(|r| r.status.as_str()))
    }

    pub fn is_approved(self) -> bool {
        self == LeaveStatus::Approved
    }
}
