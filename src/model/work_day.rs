use chrono::{NaiveDate, TimeDelta};

use crate::model::{attendance::Session, leave_request::LeaveStatus};

/// Everything known about one user on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDay {
    pub user_id: u64,
    pub date: NaiveDate,
    /// Sessions ordered by check-in
    pub sessions: Vec<Session>,
    /// Duration of the assigned shift; `None` when no shift is known
    pub shift: Option<TimeDelta>,
    pub leave: LeaveStatus,
    /// The date is today and has not been closed yet
    pub is_open: bool,
}

impl WorkDay {
    pub fn new(user_id: u64, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            sessions: Vec::new(),
            shift: None,
            leave: LeaveStatus::None,
            is_open: false,
        }
    }

    pub fn with_sessions(mut self, mut sessions: Vec<Session>) -> Self {
        sessions.sort_by_key(|s| s.check_in);
        self.sessions = sessions;
        self
    }

    pub fn with_shift(mut self, shift: Option<TimeDelta>) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_leave(mut self, leave: LeaveStatus) -> Self {
        self.leave = leave;
        self
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    /// Sum of all matched check-in/check-out pairs.
    pub fn worked(&self) -> TimeDelta {
        self.sessions
            .iter()
            .fold(TimeDelta::zero(), |total, s| total + s.worked())
    }

    pub fn has_open_session(&self) -> bool {
        self.sessions.iter().any(Session::is_open)
    }
}
