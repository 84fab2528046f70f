pub mod daily_attendance;
pub mod scheduler;

pub use daily_attendance::{JobOptions, RunSummary, run_daily_attendance};
