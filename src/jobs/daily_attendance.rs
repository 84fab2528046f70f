//! End-of-day finalization of attendance statuses for every active user.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{NaiveDate, TimeDelta};
use derive_more::Display;
use strum::IntoEnumIterator;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    classifier::{self, LeaveShortfallPolicy},
    error::{ConfigurationError, StoreError, StoreResult},
    model::{
        attendance::{AttendanceStatus, StoredStatus},
        user::UserRef,
        work_day::WorkDay,
    },
    store::AttendanceStore,
};

#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    pub policy: LeaveShortfallPolicy,
    /// Used for users without an assigned shift
    pub default_shift: Option<TimeDelta>,
    /// Classify without writing
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated {
        status: AttendanceStatus,
        previous: Option<AttendanceStatus>,
    },
    Unchanged {
        status: AttendanceStatus,
    },
    Skipped {
        reason: ConfigurationError,
    },
}

impl Outcome {
    pub fn status(&self) -> Option<AttendanceStatus> {
        match self {
            Outcome::Updated { status, .. } | Outcome::Unchanged { status } => Some(*status),
            Outcome::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOutcome {
    pub user: UserRef,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}: {}", user, reason)]
pub struct SkippedUser<'a> {
    pub user: &'a UserRef,
    pub reason: &'a ConfigurationError,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub date: NaiveDate,
    pub dry_run: bool,
    pub outcomes: Vec<UserOutcome>,
}

impl RunSummary {
    /// Number of users per finalized status.
    pub fn counts(&self) -> BTreeMap<AttendanceStatus, usize> {
        let mut counts: BTreeMap<_, _> = AttendanceStatus::iter()
            .filter(|s| s.is_final())
            .map(|s| (s, 0))
            .collect();
        for status in self.outcomes.iter().filter_map(|o| o.outcome.status()) {
            *counts.entry(status).or_default() += 1;
        }
        counts
    }

    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Updated { .. }))
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Unchanged { .. }))
            .count()
    }

    pub fn skipped(&self) -> Vec<SkippedUser<'_>> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.outcome {
                Outcome::Skipped { reason } => Some(SkippedUser {
                    user: &o.user,
                    reason,
                }),
                _ => None,
            })
            .collect()
    }

    /// Some users could not be classified.
    pub fn is_partial(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.outcome, Outcome::Skipped { .. }))
    }

    /// Human readable report printed by manual runs.
    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Processing attendance for date: {}", self.date);
        if self.dry_run {
            let _ = writeln!(out, "DRY RUN MODE - No changes were made");
        }

        if verbose {
            for o in &self.outcomes {
                match &o.outcome {
                    Outcome::Updated { status, previous: Some(prev) } => {
                        let _ = writeln!(out, "  Updated {}: {} (was {})", o.user, status, prev);
                    }
                    Outcome::Updated { status, previous: None } => {
                        let _ = writeln!(out, "  Updated {}: {}", o.user, status);
                    }
                    Outcome::Unchanged { status } => {
                        let _ = writeln!(out, "  Unchanged {}: {}", o.user, status);
                    }
                    Outcome::Skipped { .. } => {}
                }
            }
        }

        for (status, count) in self.counts() {
            let _ = writeln!(out, "{:<26}{}", format!("{}:", status), count);
        }

        let verb = if self.dry_run { "Would update" } else { "Updated" };
        let _ = writeln!(
            out,
            "{} {} attendance record(s), {} unchanged",
            verb,
            self.updated(),
            self.unchanged()
        );

        let skipped = self.skipped();
        if !skipped.is_empty() {
            let _ = writeln!(out, "Skipped {} user(s):", skipped.len());
            for s in skipped {
                let _ = writeln!(out, "  - {}", s);
            }
        }

        out
    }
}

/// Assembles the closed WorkDay of a user from the store.
pub async fn load_work_day<S: AttendanceStore>(
    store: &S,
    user_id: u64,
    date: NaiveDate,
    default_shift: Option<TimeDelta>,
) -> StoreResult<WorkDay> {
    let sessions = store.sessions(user_id, date).await?;
    let shift = store
        .shift(user_id)
        .await?
        .map(|s| s.duration())
        .or(default_shift);
    let leave = store.leave_status(user_id, date).await?;

    Ok(WorkDay::new(user_id, date)
        .with_sessions(sessions)
        .with_shift(shift)
        .with_leave(leave))
}

/// Finalizes `date` for every active user.
///
/// Users whose shift is unusable are skipped and reported in the summary.
/// A store failure aborts the run; users already written stay written, and
/// a re-run with the same inputs writes nothing new.
pub async fn run_daily_attendance<S: AttendanceStore>(
    store: &S,
    date: NaiveDate,
    options: &JobOptions,
) -> StoreResult<RunSummary> {
    let run_id = Uuid::new_v4();
    let span = info_span!("daily_attendance", %run_id, %date, dry_run = options.dry_run);

    async move {
        info!("Daily attendance run started");

        let users = store.active_users().await?;
        let mut outcomes = Vec::with_capacity(users.len());

        for user in users {
            let outcome = process_user(store, &user, date, options).await?;
            match &outcome {
                Outcome::Updated { status, previous } => {
                    debug!(user = %user, %status, ?previous, "status updated")
                }
                Outcome::Unchanged { status } => debug!(user = %user, %status, "status unchanged"),
                Outcome::Skipped { reason } => {
                    warn!(user = %user, %reason, "skipping user")
                }
            }
            outcomes.push(UserOutcome { user, outcome });
        }

        let summary = RunSummary {
            run_id,
            date,
            dry_run: options.dry_run,
            outcomes,
        };

        info!(
            users = summary.outcomes.len(),
            updated = summary.updated(),
            unchanged = summary.unchanged(),
            skipped = summary.skipped().len(),
            "Daily attendance run finished"
        );

        Ok::<_, StoreError>(summary)
    }
    .instrument(span)
    .await
}

async fn process_user<S: AttendanceStore>(
    store: &S,
    user: &UserRef,
    date: NaiveDate,
    options: &JobOptions,
) -> StoreResult<Outcome> {
    let day = load_work_day(store, user.id, date, options.default_shift).await?;

    let status = match classifier::finalize(
        day.worked(),
        day.shift,
        day.leave.is_approved(),
        options.policy,
    ) {
        Ok(status) => status,
        Err(reason) => return Ok(Outcome::Skipped { reason }),
    };

    let new = StoredStatus {
        status,
        worked: TimeDelta::seconds(day.worked().num_seconds()),
    };
    let previous = store.stored_status(user.id, date).await?;

    if previous == Some(new) {
        return Ok(Outcome::Unchanged { status });
    }

    if !options.dry_run {
        store.save_status(user.id, date, new).await?;
    }

    Ok(Outcome::Updated {
        status,
        previous: previous.map(|p| p.status),
    })
}
