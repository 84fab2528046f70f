//! In-memory attendance store used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use hrm_attendance::error::{StoreError, StoreResult};
use hrm_attendance::model::{
    attendance::{Session, StoredStatus},
    leave_request::LeaveStatus,
    shift::Shift,
    user::UserRef,
};
use hrm_attendance::store::AttendanceStore;

#[derive(Default)]
struct Inner {
    users: Vec<UserRef>,
    sessions: Vec<Session>,
    shifts: HashMap<u64, Shift>,
    leave: HashMap<(u64, NaiveDate), LeaveStatus>,
    statuses: HashMap<(u64, NaiveDate), StoredStatus>,
    writes: usize,
    shift_lookups: usize,
    fail_sessions_for: Option<u64>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: u64, username: &str) {
        self.inner.lock().unwrap().users.push(UserRef {
            id,
            username: username.to_string(),
        });
    }

    pub fn assign_shift(&self, user_id: u64, start: (u32, u32), end: (u32, u32)) {
        let shift = Shift {
            id: user_id,
            name: format!("shift-{}", user_id),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        };
        self.inner.lock().unwrap().shifts.insert(user_id, shift);
    }

    /// Adds a session on `day` between the given hours; `to = None` leaves it open.
    pub fn add_session(&self, user_id: u64, day: NaiveDate, from: (u32, u32), to: Option<(u32, u32)>) {
        let at = |(h, m): (u32, u32)| day.and_hms_opt(h, m, 0).unwrap();
        let mut inner = self.inner.lock().unwrap();
        let id = inner.sessions.len() as u64 + 1;
        inner.sessions.push(Session {
            id,
            user_id,
            date: day,
            check_in: at(from),
            check_out: to.map(at),
        });
    }

    /// Checks out the user's open session at `at`, which may fall on a later day.
    pub fn close_session(&self, user_id: u64, at: NaiveDateTime) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(open) = inner
            .sessions
            .iter_mut()
            .rev()
            .find(|s| s.user_id == user_id && s.check_out.is_none())
        {
            open.check_out = Some(at);
        }
    }

    pub fn set_leave(&self, user_id: u64, day: NaiveDate, leave: LeaveStatus) {
        self.inner.lock().unwrap().leave.insert((user_id, day), leave);
    }

    pub fn put_status(&self, user_id: u64, day: NaiveDate, status: StoredStatus) {
        self.inner.lock().unwrap().statuses.insert((user_id, day), status);
    }

    pub fn status(&self, user_id: u64, day: NaiveDate) -> Option<StoredStatus> {
        self.inner.lock().unwrap().statuses.get(&(user_id, day)).copied()
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub fn shift_lookups(&self) -> usize {
        self.inner.lock().unwrap().shift_lookups
    }

    pub fn fail_sessions_for(&self, user_id: u64) {
        self.inner.lock().unwrap().fail_sessions_for = Some(user_id);
    }
}

impl AttendanceStore for MemoryStore {
    async fn active_users(&self) -> StoreResult<Vec<UserRef>> {
        let mut users = self.inner.lock().unwrap().users.clone();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn sessions(&self, user_id: u64, day: NaiveDate) -> StoreResult<Vec<Session>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_sessions_for == Some(user_id) {
            return Err(StoreError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id && s.date == day)
            .cloned()
            .collect())
    }

    async fn shift(&self, user_id: u64) -> StoreResult<Option<Shift>> {
        let mut inner = self.inner.lock().unwrap();
        inner.shift_lookups += 1;
        Ok(inner.shifts.get(&user_id).cloned())
    }

    async fn leave_status(&self, user_id: u64, day: NaiveDate) -> StoreResult<LeaveStatus> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .leave
            .get(&(user_id, day))
            .copied()
            .unwrap_or_default())
    }

    async fn stored_status(&self, user_id: u64, day: NaiveDate) -> StoreResult<Option<StoredStatus>> {
        Ok(self.status(user_id, day))
    }

    async fn save_status(&self, user_id: u64, day: NaiveDate, status: StoredStatus) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.writes += 1;
        inner.statuses.insert((user_id, day), status);
        Ok(())
    }
}
