use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: u64,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Shift {
    /// Expected working time. An end before the start wraps past midnight;
    /// identical start and end give a zero-length shift.
    pub fn duration(&self) -> TimeDelta {
        let span = self.end_time.signed_duration_since(self.start_time);
        if span >= TimeDelta::zero() {
            span
        } else {
            TimeDelta::hours(24) + span
        }
    }
}
