use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveTime, TimeDelta};
use dotenvy::dotenv;
use tracing::Level;

use crate::classifier::LeaveShortfallPolicy;
use crate::jobs::JobOptions;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_api_per_min: u32,

    // Daily job
    pub daily_run_at: NaiveTime,
    pub scheduler_enabled: bool,
    pub leave_shortfall_policy: LeaveShortfallPolicy,
    pub default_shift: Option<TimeDelta>,

    // Logging
    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `from_env` passes the process
    /// environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let default_shift = match get("DEFAULT_SHIFT_MINUTES") {
            Some(v) => {
                let minutes = v
                    .trim()
                    .parse::<i64>()
                    .context("DEFAULT_SHIFT_MINUTES must be a whole number of minutes")?;
                Some(TimeDelta::try_minutes(minutes).context("DEFAULT_SHIFT_MINUTES out of range")?)
            }
            None => None,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?,
            server_addr: or("SERVER_ADDR", "127.0.0.1:8080"),
            api_prefix: or("API_PREFIX", "/api"),

            rate_api_per_min: or("RATE_API_PER_MIN", "600")
                .parse()
                .context("RATE_API_PER_MIN must be a number")?,

            daily_run_at: NaiveTime::parse_from_str(&or("DAILY_RUN_AT", "23:59"), "%H:%M")
                .context("DAILY_RUN_AT must be HH:MM")?,
            scheduler_enabled: or("SCHEDULER_ENABLED", "true")
                .parse()
                .context("SCHEDULER_ENABLED must be true or false")?,
            leave_shortfall_policy: LeaveShortfallPolicy::from_str(&or(
                "LEAVE_SHORTFALL_POLICY",
                "absent",
            ))
            .context("LEAVE_SHORTFALL_POLICY must be absent or half_day_despite_leave")?,
            default_shift,

            log_dir: or("LOG_DIR", "logs"),
            log_level: Level::from_str(&or("LOG_LEVEL", "debug"))
                .context("LOG_LEVEL must be one of trace, debug, info, warn, error")?,
        })
    }

    pub fn job_options(&self, dry_run: bool) -> JobOptions {
        JobOptions {
            policy: self.leave_shortfall_policy,
            default_shift: self.default_shift,
            dry_run,
        }
    }
}
