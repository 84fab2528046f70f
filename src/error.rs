//! Error types shared by the classifier, the store and the binaries.

use chrono::NaiveDate;
use thiserror::Error;

/// The user's shift cannot be used to classify a day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No active shift is assigned and no default shift is configured
    #[error("no shift assigned")]
    MissingShift,

    /// Shift lasts zero minutes or less
    #[error("shift duration must be positive, got {minutes} minutes")]
    NonPositiveShift { minutes: i64 },
}

/// Failure talking to the attendance store. Fatal for a whole run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Unknown attendance status {status:?} stored for user {user_id} on {date}")]
    CorruptStatus {
        user_id: u64,
        date: NaiveDate,
        status: String,
    },

    #[error("Refusing to store in-progress status for user {user_id} on {date}")]
    NotFinal { user_id: u64, date: NaiveDate },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected `--date` argument.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateArgError {
    #[error("Invalid date format {0:?}. Use YYYY-MM-DD.")]
    InvalidFormat(String),

    #[error("{date} is in the future (today is {today})")]
    InFuture { date: NaiveDate, today: NaiveDate },

    #[error("No calendar day precedes {0}")]
    OutOfRange(NaiveDate),
}
