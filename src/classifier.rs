//! Attendance status classification.
//!
//! Two paths share the same thresholds: [`finalize`] produces the status stored
//! once a day is closed, [`live`] produces the in-progress display for today.
//! Both are pure; callers load the inputs and persist the result.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use crate::{
    error::ConfigurationError,
    model::{attendance::AttendanceStatus, work_day::WorkDay},
};

/// Fraction of a shift, compared exactly on integer milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    num: i64,
    den: i64,
}

/// Worked at least 75% of the shift
pub const PRESENT: Threshold = Threshold { num: 3, den: 4 };
/// Worked at least 50% of the shift
pub const HALF_DAY: Threshold = Threshold { num: 1, den: 2 };

impl Threshold {
    pub fn reached(self, worked: TimeDelta, shift: TimeDelta) -> bool {
        i128::from(worked.num_milliseconds()) * i128::from(self.den)
            >= i128::from(shift.num_milliseconds()) * i128::from(self.num)
    }
}

/// How to classify a day with approved leave where the user still worked,
/// but less than half the shift.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveShortfallPolicy {
    /// Partial work below half a shift is not attendance
    #[default]
    Absent,
    /// Any work on a leave day counts as a half day
    HalfDayDespiteLeave,
}

/// Returns the shift duration if it can be used as a divisor.
pub fn validate_shift(shift: Option<TimeDelta>) -> Result<TimeDelta, ConfigurationError> {
    match shift {
        None => Err(ConfigurationError::MissingShift),
        Some(s) if s <= TimeDelta::zero() => Err(ConfigurationError::NonPositiveShift {
            minutes: s.num_minutes(),
        }),
        Some(s) => Ok(s),
    }
}

/// End-of-day status for a closed day. Never returns `Active`.
pub fn finalize(
    worked: TimeDelta,
    shift: Option<TimeDelta>,
    leave_approved: bool,
    policy: LeaveShortfallPolicy,
) -> Result<AttendanceStatus, ConfigurationError> {
    let shift = validate_shift(shift)?;
    let worked = worked.max(TimeDelta::zero());

    let status = if PRESENT.reached(worked, shift) {
        if leave_approved {
            AttendanceStatus::PresentDespiteLeave
        } else {
            AttendanceStatus::Present
        }
    } else if HALF_DAY.reached(worked, shift) {
        if leave_approved {
            AttendanceStatus::HalfDayDespiteLeave
        } else {
            AttendanceStatus::HalfDay
        }
    } else if !leave_approved {
        AttendanceStatus::Absent
    } else if worked == TimeDelta::zero() {
        AttendanceStatus::OnLeave
    } else {
        match policy {
            LeaveShortfallPolicy::Absent => AttendanceStatus::Absent,
            LeaveShortfallPolicy::HalfDayDespiteLeave => AttendanceStatus::HalfDayDespiteLeave,
        }
    };

    Ok(status)
}

/// In-progress status for today. `None` means nothing is shown yet: no
/// check-in at all, or checked out below the present threshold.
pub fn live(day: &WorkDay) -> Result<Option<AttendanceStatus>, ConfigurationError> {
    if day.has_open_session() {
        return Ok(Some(AttendanceStatus::Active));
    }
    if day.sessions.is_empty() {
        return Ok(None);
    }

    let shift = validate_shift(day.shift)?;
    Ok(PRESENT
        .reached(day.worked(), shift)
        .then_some(AttendanceStatus::Present))
}

/// Dispatches on whether the day is still open.
pub fn classify(
    day: &WorkDay,
    policy: LeaveShortfallPolicy,
) -> Result<Option<AttendanceStatus>, ConfigurationError> {
    if day.is_open {
        live(day)
    } else {
        finalize(day.worked(), day.shift, day.leave.is_approved(), policy).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{attendance::Session, leave_request::LeaveStatus};
    use chrono::NaiveDate;
    use std::str::FromStr;

    const H: fn(i64) -> TimeDelta = TimeDelta::hours;

    fn fin(worked: TimeDelta, leave: bool) -> AttendanceStatus {
        finalize(worked, Some(H(8)), leave, LeaveShortfallPolicy::Absent).unwrap()
    }

    #[test]
    fn full_shift_is_present() {
        assert_eq!(fin(H(8), false), AttendanceStatus::Present);
        assert_eq!(fin(H(8), true), AttendanceStatus::PresentDespiteLeave);
    }

    #[test]
    fn between_half_and_three_quarters_is_half_day() {
        assert_eq!(fin(H(5), false), AttendanceStatus::HalfDay);
        assert_eq!(fin(H(5), true), AttendanceStatus::HalfDayDespiteLeave);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(fin(H(6), false), AttendanceStatus::Present);
        assert_eq!(fin(H(6), true), AttendanceStatus::PresentDespiteLeave);
        assert_eq!(fin(H(4), false), AttendanceStatus::HalfDay);
        assert_eq!(fin(H(4), true), AttendanceStatus::HalfDayDespiteLeave);

        let just_below = H(6) - TimeDelta::milliseconds(1);
        assert_eq!(fin(just_below, false), AttendanceStatus::HalfDay);
        let just_below = H(4) - TimeDelta::milliseconds(1);
        assert_eq!(fin(just_below, false), AttendanceStatus::Absent);
    }

    #[test]
    fn thresholds_hold_for_uneven_shifts() {
        // 7h30 shift: 75% is 5h37m30s, 50% is 3h45m
        let shift = Some(TimeDelta::minutes(450));
        let p = LeaveShortfallPolicy::Absent;
        assert_eq!(
            finalize(TimeDelta::seconds(20250), shift, false, p),
            Ok(AttendanceStatus::Present)
        );
        assert_eq!(
            finalize(TimeDelta::seconds(20249), shift, false, p),
            Ok(AttendanceStatus::HalfDay)
        );
        assert_eq!(
            finalize(TimeDelta::minutes(225), shift, false, p),
            Ok(AttendanceStatus::HalfDay)
        );
    }

    #[test]
    fn no_work_depends_on_leave() {
        assert_eq!(fin(TimeDelta::zero(), true), AttendanceStatus::OnLeave);
        assert_eq!(fin(TimeDelta::zero(), false), AttendanceStatus::Absent);
        assert_eq!(fin(H(3), false), AttendanceStatus::Absent);
    }

    #[test]
    fn short_work_on_leave_day_defaults_to_absent() {
        assert_eq!(
            finalize(H(3), Some(H(8)), true, LeaveShortfallPolicy::Absent),
            Ok(AttendanceStatus::Absent)
        );
    }

    #[test]
    fn short_work_on_leave_day_can_count_as_half_day() {
        let p = LeaveShortfallPolicy::HalfDayDespiteLeave;
        assert_eq!(
            finalize(H(3), Some(H(8)), true, p),
            Ok(AttendanceStatus::HalfDayDespiteLeave)
        );
        // policy only touches the leave case with some work
        assert_eq!(finalize(H(3), Some(H(8)), false, p), Ok(AttendanceStatus::Absent));
        assert_eq!(
            finalize(TimeDelta::zero(), Some(H(8)), true, p),
            Ok(AttendanceStatus::OnLeave)
        );
    }

    #[test]
    fn unusable_shift_is_a_configuration_error() {
        let p = LeaveShortfallPolicy::Absent;
        assert_eq!(
            finalize(H(8), Some(TimeDelta::zero()), false, p),
            Err(ConfigurationError::NonPositiveShift { minutes: 0 })
        );
        assert_eq!(
            finalize(H(8), Some(-H(1)), false, p),
            Err(ConfigurationError::NonPositiveShift { minutes: -60 })
        );
        assert_eq!(
            finalize(TimeDelta::zero(), None, true, p),
            Err(ConfigurationError::MissingShift)
        );
    }

    #[test]
    fn finalize_is_deterministic_and_never_active() {
        let policies = [
            LeaveShortfallPolicy::Absent,
            LeaveShortfallPolicy::HalfDayDespiteLeave,
        ];
        for minutes in (0..=600).step_by(15) {
            for leave in [false, true] {
                for policy in policies {
                    let worked = TimeDelta::minutes(minutes);
                    let a = finalize(worked, Some(H(8)), leave, policy).unwrap();
                    let b = finalize(worked, Some(H(8)), leave, policy).unwrap();
                    assert_eq!(a, b);
                    assert!(a.is_final());
                }
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
    }

    fn session(id: u64, from: u32, to: Option<u32>) -> Session {
        let at = |h| today().and_hms_opt(h, 0, 0).unwrap();
        Session {
            id,
            user_id: 3,
            date: today(),
            check_in: at(from),
            check_out: to.map(at),
        }
    }

    #[test]
    fn live_shows_active_while_checked_in() {
        let day = WorkDay::new(3, today())
            .with_sessions(vec![session(1, 8, Some(12)), session(2, 13, None)])
            .open(true);
        assert_eq!(live(&day), Ok(Some(AttendanceStatus::Active)));
    }

    #[test]
    fn live_shows_present_once_checked_out_over_threshold() {
        let day = WorkDay::new(3, today())
            .with_sessions(vec![session(1, 8, Some(12)), session(2, 13, Some(15))])
            .with_shift(Some(H(8)))
            .open(true);
        assert_eq!(live(&day), Ok(Some(AttendanceStatus::Present)));
    }

    #[test]
    fn live_shows_nothing_below_threshold_or_without_check_in() {
        let short = WorkDay::new(3, today())
            .with_sessions(vec![session(1, 8, Some(12))])
            .with_shift(Some(H(8)))
            .open(true);
        assert_eq!(live(&short), Ok(None));

        let empty = WorkDay::new(3, today()).open(true);
        assert_eq!(live(&empty), Ok(None));
    }

    #[test]
    fn live_needs_a_shift_once_checked_out() {
        let day = WorkDay::new(3, today())
            .with_sessions(vec![session(1, 8, Some(16))])
            .open(true);
        assert_eq!(live(&day), Err(ConfigurationError::MissingShift));
    }

    #[test]
    fn classify_picks_path_by_openness() {
        let day = WorkDay::new(3, today())
            .with_sessions(vec![session(1, 8, Some(10)), session(2, 11, None)])
            .with_shift(Some(H(8)))
            .with_leave(LeaveStatus::Approved);
        let p = LeaveShortfallPolicy::Absent;

        assert_eq!(
            classify(&day.clone().open(true), p),
            Ok(Some(AttendanceStatus::Active))
        );
        // the open session adds nothing once the day is closed
        assert_eq!(classify(&day, p), Ok(Some(AttendanceStatus::Absent)));
        assert_eq!(
            classify(&day, LeaveShortfallPolicy::HalfDayDespiteLeave),
            Ok(Some(AttendanceStatus::HalfDayDespiteLeave))
        );
    }

    #[test]
    fn policy_parses_from_config_value() {
        assert_eq!(
            LeaveShortfallPolicy::from_str("half_day_despite_leave"),
            Ok(LeaveShortfallPolicy::HalfDayDespiteLeave)
        );
        assert_eq!(
            LeaveShortfallPolicy::from_str("absent"),
            Ok(LeaveShortfallPolicy::Absent)
        );
        assert!(LeaveShortfallPolicy::from_str("on_leave").is_err());
    }
}
