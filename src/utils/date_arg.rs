use chrono::NaiveDate;

use crate::error::DateArgError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateArgError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DateArgError::InvalidFormat(value.to_string()))
}

/// Date a manual run targets: the given date, or yesterday. Future dates
/// are rejected since they cannot be closed yet.
pub fn resolve_target_date(
    requested: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<NaiveDate, DateArgError> {
    match requested {
        Some(date) if date > today => Err(DateArgError::InFuture { date, today }),
        Some(date) => Ok(date),
        None => today.pred_opt().ok_or(DateArgError::OutOfRange(today)),
    }
}
