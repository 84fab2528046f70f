use crate::api::attendance::{
    DayStatusResponse, RunQuery, RunSummaryResponse, SkippedUserResponse, StatusQuery,
};
use crate::model::attendance::AttendanceStatus;
use crate::view::StatusSource;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Daily Attendance Status

Tracks check-in/check-out sessions and finalizes one attendance status per user and day.

### 🔹 Statuses
- **Present** / **Present (Despite Leave)**: worked at least 75% of the shift
- **Half Day** / **Half Day (Despite Leave)**: worked at least 50% of the shift
- **On Leave**: approved leave and no work recorded
- **Absent**: anything else
- **Active**: today only, while a check-in is still open

### ⏰ Finalization
A daily job closes each day at a configured local time. Statuses can also be
recomputed for any past date through the run endpoint or the
`update_daily_attendance` command.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::day_status,
        crate::api::attendance::run_daily_status,
    ),
    components(
        schemas(
            AttendanceStatus,
            StatusSource,
            StatusQuery,
            DayStatusResponse,
            RunQuery,
            RunSummaryResponse,
            SkippedUserResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance tracking and daily status APIs"),
    )
)]
pub struct ApiDoc;
