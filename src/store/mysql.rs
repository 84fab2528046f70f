use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use futures_util::StreamExt;
use sqlx::MySqlPool;

use super::AttendanceStore;
use crate::{
    error::{StoreError, StoreResult},
    model::{
        attendance::{AttendanceStatus, DailyAttendanceRow, Session, StoredStatus},
        leave_request::{LeaveRequest, LeaveStatus},
        shift::Shift,
        user::UserRef,
    },
};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Opens a session at `now`. Returns false when the user already has an
    /// open session.
    pub async fn check_in(&self, user_id: u64, now: NaiveDateTime) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_sessions (user_id, date, check_in)
            SELECT ?, ?, ?
            FROM DUAL
            WHERE NOT EXISTS (
                SELECT 1 FROM attendance_sessions
                WHERE user_id = ? AND check_out IS NULL
            )
            "#,
        )
        .bind(user_id)
        .bind(now.date())
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Closes the latest open session at `now`. Returns false when there is
    /// nothing to close.
    pub async fn check_out(&self, user_id: u64, now: NaiveDateTime) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_sessions
            SET check_out = ?
            WHERE user_id = ?
            AND check_out IS NULL
            ORDER BY check_in DESC
            LIMIT 1
            "#,
        )
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl AttendanceStore for MySqlStore {
    async fn active_users(&self) -> StoreResult<Vec<UserRef>> {
        let mut stream = sqlx::query_as::<_, UserRef>(
            r#"
            SELECT id, username
            FROM users
            WHERE is_active = 1
            ORDER BY id
            "#,
        )
        .fetch(&self.pool);

        let mut users = Vec::new();
        while let Some(row) = stream.next().await {
            users.push(row?);
        }

        Ok(users)
    }

    async fn sessions(&self, user_id: u64, date: NaiveDate) -> StoreResult<Vec<Session>> {
        let sessions = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, date, check_in, check_out
            FROM attendance_sessions
            WHERE user_id = ? AND date = ?
            ORDER BY check_in
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn shift(&self, user_id: u64) -> StoreResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT s.id, s.name, s.start_time, s.end_time
            FROM shifts s
            JOIN user_shifts us ON us.shift_id = s.id
            WHERE us.user_id = ? AND s.is_active = 1
            ORDER BY s.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    async fn leave_status(&self, user_id: u64, date: NaiveDate) -> StoreResult<LeaveStatus> {
        let requests = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT id, user_id, start_date, end_date, leave_type, status
            FROM leave_requests
            WHERE user_id = ?
            AND start_date <= ?
            AND end_date >= ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(LeaveStatus::from_requests(&requests))
    }

    async fn stored_status(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<StoredStatus>> {
        let row = sqlx::query_as::<_, DailyAttendanceRow>(
            r#"
            SELECT status, worked_seconds
            FROM daily_attendance
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status = AttendanceStatus::from_str(&row.status)
            .ok()
            .filter(|s| s.is_final())
            .ok_or_else(|| StoreError::CorruptStatus {
                user_id,
                date,
                status: row.status.clone(),
            })?;

        Ok(Some(StoredStatus {
            status,
            worked: TimeDelta::seconds(row.worked_seconds),
        }))
    }

    async fn save_status(
        &self,
        user_id: u64,
        date: NaiveDate,
        status: StoredStatus,
    ) -> StoreResult<()> {
        if !status.status.is_final() {
            return Err(StoreError::NotFinal { user_id, date });
        }

        sqlx::query(
            r#"
            INSERT INTO daily_attendance (user_id, date, status, worked_seconds)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                status = VALUES(status),
                worked_seconds = VALUES(worked_seconds),
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(status.status.code())
        .bind(status.worked.num_seconds())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
