//! Persistence boundary of the daily attendance job.

pub mod mysql;

use chrono::NaiveDate;

use crate::{
    error::StoreResult,
    model::{
        attendance::{Session, StoredStatus},
        leave_request::LeaveStatus,
        shift::Shift,
        user::UserRef,
    },
};

pub use mysql::MySqlStore;

/// Records the job reads and the one it writes. Missing data is reported as
/// empty, never as an error: no sessions, no shift, no leave.
#[allow(async_fn_in_trait)]
pub trait AttendanceStore {
    /// Users to process, ordered by id
    async fn active_users(&self) -> StoreResult<Vec<UserRef>>;

    async fn sessions(&self, user_id: u64, date: NaiveDate) -> StoreResult<Vec<Session>>;

    /// First active shift assigned to the user
    async fn shift(&self, user_id: u64) -> StoreResult<Option<Shift>>;

    async fn leave_status(&self, user_id: u64, date: NaiveDate) -> StoreResult<LeaveStatus>;

    async fn stored_status(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<StoredStatus>>;

    /// Inserts or overwrites the finalized status of (user, date).
    async fn save_status(
        &self,
        user_id: u64,
        date: NaiveDate,
        status: StoredStatus,
    ) -> StoreResult<()>;
}
