use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::Config,
    error::StoreError,
    jobs::{RunSummary, daily_attendance::Outcome, run_daily_attendance},
    model::{attendance::AttendanceStatus, work_day::WorkDay},
    store::{AttendanceStore, MySqlStore},
    utils::{date_arg::resolve_target_date, shift_cache},
    view::{StatusSource, resolve_day_view},
};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct StatusQuery {
    /// Day to show, defaults to today
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "user_id": 7,
    "date": "2026-01-01",
    "status": "present",
    "label": "Present",
    "source": "live",
    "worked_seconds": 28800,
    "open_session": false
}))]
pub struct DayStatusResponse {
    pub user_id: u64,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Absent while the day is open and nothing can be shown yet
    pub status: Option<AttendanceStatus>,
    pub label: Option<String>,
    pub source: StatusSource,
    pub worked_seconds: i64,
    pub open_session: bool,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RunQuery {
    /// Day to finalize, defaults to yesterday
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    /// Classify without writing
    #[schema(example = false)]
    pub dry_run: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct SkippedUserResponse {
    pub user_id: u64,
    pub username: String,
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "run_id": "5f0c6c1e-4a53-4c8b-9a43-0d3c3f8b9f21",
    "date": "2026-01-01",
    "dry_run": false,
    "counts": { "present": 41, "half_day": 2, "absent": 1, "on_leave": 3 },
    "updated": 12,
    "unchanged": 35,
    "skipped": [{ "user_id": 9, "username": "jdoe", "reason": "no shift assigned" }],
    "partial": true
}))]
pub struct RunSummaryResponse {
    pub run_id: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub dry_run: bool,
    #[schema(value_type = Object)]
    pub counts: std::collections::BTreeMap<AttendanceStatus, usize>,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: Vec<SkippedUserResponse>,
    pub partial: bool,
}

impl From<&RunSummary> for RunSummaryResponse {
    fn from(summary: &RunSummary) -> Self {
        let skipped = summary
            .outcomes
            .iter()
            .filter_map(|o| match &o.outcome {
                Outcome::Skipped { reason } => Some(SkippedUserResponse {
                    user_id: o.user.id,
                    username: o.user.username.clone(),
                    reason: reason.to_string(),
                }),
                _ => None,
            })
            .collect();

        Self {
            run_id: summary.run_id.to_string(),
            date: summary.date,
            dry_run: summary.dry_run,
            counts: summary.counts(),
            updated: summary.updated(),
            unchanged: summary.unchanged(),
            skipped,
            partial: summary.is_partial(),
        }
    }
}

fn internal_error(e: StoreError, context: &'static str) -> actix_web::Error {
    tracing::error!(error = %e, "{}", context);
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/{user_id}/check-in",
    params(
        ("user_id" = u64, Path, description = "User checking in")
    ),
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully"
        })),
        (status = 400, description = "Already checked in", body = Object, example = json!({
            "message": "Already checked in"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    store: web::Data<MySqlStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let now = Local::now().naive_local();

    let opened = store
        .check_in(user_id, now)
        .await
        .map_err(|e| internal_error(e, "Check-in failed"))?;

    if !opened {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already checked in"
        })));
    }

    tracing::debug!(user_id, %now, "checked in");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked in successfully"
    })))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/{user_id}/check-out",
    params(
        ("user_id" = u64, Path, description = "User checking out")
    ),
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No open check-in found", body = Object, example = json!({
            "message": "No open check-in found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    store: web::Data<MySqlStore>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let now = Local::now().naive_local();

    let closed = store
        .check_out(user_id, now)
        .await
        .map_err(|e| internal_error(e, "Check-out failed"))?;

    if !closed {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No open check-in found"
        })));
    }

    tracing::debug!(user_id, %now, "checked out");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

/// Status of one user on one day: finalized if stored, live for today
#[utoipa::path(
    get,
    path = "/api/attendance/{user_id}/status",
    params(
        ("user_id" = u64, Path, description = "User to look up"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Day status", body = DayStatusResponse),
        (status = 400, description = "Date is in the future"),
        (status = 422, description = "User has no usable shift", body = Object, example = json!({
            "message": "no shift assigned"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn day_status(
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    query: web::Query<StatusQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();
    let today = Local::now().date_naive();
    let date = query.date.unwrap_or(today);

    if date > today {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "date cannot be in the future"
        })));
    }

    let store = store.get_ref();
    let load = async {
        let stored = store.stored_status(user_id, date).await?;
        let sessions = store.sessions(user_id, date).await?;
        let shift = shift_cache::cached_shift(store, user_id).await?;
        let leave = store.leave_status(user_id, date).await?;
        Ok::<_, StoreError>((stored, sessions, shift, leave))
    };
    let (stored, sessions, shift, leave) = load
        .await
        .map_err(|e| internal_error(e, "Loading day status failed"))?;

    let day = WorkDay::new(user_id, date)
        .with_sessions(sessions)
        .with_shift(shift.map(|s| s.duration()).or(config.default_shift))
        .with_leave(leave)
        .open(date == today);

    let view = match resolve_day_view(&day, stored, config.leave_shortfall_policy) {
        Ok(view) => view,
        Err(e) => {
            tracing::warn!(user_id, %date, error = %e, "Cannot classify day");
            return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    Ok(HttpResponse::Ok().json(DayStatusResponse {
        user_id,
        date,
        status: view.status,
        label: view.status.map(|s| s.label().to_string()),
        source: view.source,
        worked_seconds: view.worked.num_seconds(),
        open_session: view.open_session,
    }))
}

/// Manually run the daily finalization for a date
#[utoipa::path(
    post,
    path = "/api/attendance/daily-status/run",
    params(RunQuery),
    responses(
        (status = 200, description = "Run finished", body = RunSummaryResponse),
        (status = 400, description = "Date is in the future"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn run_daily_status(
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
    query: web::Query<RunQuery>,
) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();
    let date = match resolve_target_date(query.date, today) {
        Ok(date) => date,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    let options = config.job_options(query.dry_run.unwrap_or(false));
    let summary = run_daily_attendance(store.get_ref(), date, &options)
        .await
        .map_err(|e| internal_error(e, "Manual daily attendance run failed"))?;

    Ok(HttpResponse::Ok().json(RunSummaryResponse::from(&summary)))
}
