pub mod attendance;
pub mod leave_request;
pub mod shift;
pub mod user;
pub mod work_day;
