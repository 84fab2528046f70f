//! What the status endpoint shows for a (user, date).

use chrono::TimeDelta;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    classifier::{self, LeaveShortfallPolicy},
    error::ConfigurationError,
    model::{
        attendance::{AttendanceStatus, StoredStatus},
        work_day::WorkDay,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    /// Written by the daily job
    Finalized,
    /// Computed for today while the day is open
    Live,
    /// Past day the job has not finalized yet, computed but not stored
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub status: Option<AttendanceStatus>,
    pub source: StatusSource,
    pub worked: TimeDelta,
    pub open_session: bool,
}

/// A stored status always wins; otherwise an open day is shown live and a
/// closed one as an unstored preview.
pub fn resolve_day_view(
    day: &WorkDay,
    stored: Option<StoredStatus>,
    policy: LeaveShortfallPolicy,
) -> Result<DayView, ConfigurationError> {
    let open_session = day.has_open_session();

    if let Some(stored) = stored {
        return Ok(DayView {
            status: Some(stored.status),
            source: StatusSource::Finalized,
            worked: stored.worked,
            open_session,
        });
    }

    let status = classifier::classify(day, policy)?;
    let source = if day.is_open {
        StatusSource::Live
    } else {
        StatusSource::Preview
    };

    Ok(DayView {
        status,
        source,
        worked: day.worked(),
        open_session,
    })
}
