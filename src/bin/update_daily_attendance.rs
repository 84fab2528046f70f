//! Finalize daily attendance status for all active users.
//!
//! Usage:
//!     update_daily_attendance [--date YYYY-MM-DD] [--dry-run] [--verbose]
//!
//! Cron example (close each day at 23:59):
//!     59 23 * * * /usr/local/bin/update_daily_attendance --date "$(date +\%F)"

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::error;

use hrm_attendance::config::Config;
use hrm_attendance::db::init_db;
use hrm_attendance::jobs::{RunSummary, run_daily_attendance};
use hrm_attendance::store::MySqlStore;
use hrm_attendance::telemetry;
use hrm_attendance::utils::date_arg::{parse_date, resolve_target_date};

#[derive(Parser, Debug)]
#[command(
    name = "update_daily_attendance",
    about = "Update daily attendance status for all users"
)]
struct Args {
    /// Date to process (YYYY-MM-DD format). Defaults to yesterday.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Show what would be done without actually doing it
    #[arg(long)]
    dry_run: bool,

    /// Show one line per user
    #[arg(long)]
    verbose: bool,
}

async fn run(args: &Args, config: &Config) -> Result<RunSummary> {
    let date = resolve_target_date(args.date, Local::now().date_naive())?;

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let store = MySqlStore::new(pool);

    let summary = run_daily_attendance(&store, date, &config.job_options(args.dry_run))
        .await
        .with_context(|| format!("Daily attendance run for {} failed", date))?;

    Ok(summary)
}

#[actix_web::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match telemetry::init(
        &config.log_dir,
        "update_daily_attendance.log",
        config.log_level,
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &config).await {
        Ok(summary) => {
            print!("{}", summary.render(args.verbose));
            if summary.is_partial() {
                println!("Completed with skipped users, see above");
            } else {
                println!("Successfully processed attendance for {}", summary.date);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{:#}", e), "Daily attendance update failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
