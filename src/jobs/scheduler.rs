use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{error, info};

use super::daily_attendance::{JobOptions, run_daily_attendance};
use crate::store::AttendanceStore;

/// First daily fire time strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        return today;
    }
    match now.date().succ_opt() {
        Some(tomorrow) => tomorrow.and_time(at),
        None => NaiveDateTime::MAX,
    }
}

/// Dates finalized by a fire on `fired_on`: the previous day again, so that
/// sessions still open at the last fire (overnight shifts) are counted once
/// they close, then the day being closed.
pub fn dates_due(fired_on: NaiveDate) -> Vec<NaiveDate> {
    fired_on.pred_opt().into_iter().chain([fired_on]).collect()
}

/// Finalizes every date due for a fire on `fired_on`. A failure on one date
/// is logged and does not stop the next.
pub async fn run_due<S: AttendanceStore>(store: &S, fired_on: NaiveDate, options: &JobOptions) {
    for date in dates_due(fired_on) {
        match run_daily_attendance(store, date, options).await {
            Ok(summary) if summary.is_partial() => {
                info!(%date, skipped = summary.skipped().len(), "Scheduled run finished with skipped users")
            }
            Ok(summary) => info!(%date, updated = summary.updated(), "Scheduled run finished"),
            Err(e) => error!(error = %e, %date, "Scheduled daily attendance run failed"),
        }
    }
}

/// Runs the daily job forever at local time `at`. Failed runs are logged and
/// retried at the next fire time.
pub async fn run_scheduler<S: AttendanceStore>(store: S, options: JobOptions, at: NaiveTime) {
    loop {
        let now = Local::now().naive_local();
        let next = next_run_after(now, at);
        info!(%next, "Next daily attendance run scheduled");

        let wait = next.signed_duration_since(now).to_std().unwrap_or_default();
        actix_web::rt::time::sleep(wait).await;

        run_due(&store, next.date(), &options).await;
    }
}
