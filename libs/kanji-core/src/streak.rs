//! Daily streak continuity rules.
//!
//! Days are UTC calendar dates; the caller strips the time component before
//! calling in. A streak can grow by at most one per day: repeat reviews on
//! the same date leave it unchanged, a review on the day after the last one
//! extends it, and anything else (first review ever, a gap of two or more
//! days, a stored date that sits in the future) starts over at 1.

use chrono::NaiveDate;

use crate::types::StreakState;

/// Outcome of applying one review day to the stored streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakDecision {
    /// Streak value that holds after this review day.
    pub streak: u32,
    /// Whether the stored state differs and needs a write.
    pub changed: bool,
}

/// Decide the streak value for a review recorded on `today`.
///
/// Pure date arithmetic; persistence and concurrency are the store's
/// problem. `current` is the stored state, if any.
pub fn advance(current: Option<StreakState>, today: NaiveDate) -> StreakDecision {
    let Some(state) = current else {
        return StreakDecision { streak: 1, changed: true };
    };

    if state.last_review_date == today {
        StreakDecision { streak: state.daily_streak, changed: false }
    } else if state.last_review_date.succ_opt() == Some(today) {
        StreakDecision { streak: state.daily_streak + 1, changed: true }
    } else {
        StreakDecision { streak: 1, changed: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state(streak: u32, last: NaiveDate) -> StreakState {
        StreakState { daily_streak: streak, last_review_date: last }
    }

    #[test]
    fn test_first_review_starts_at_one() {
        let decision = advance(None, date(2024, 6, 1));
        assert_eq!(decision, StreakDecision { streak: 1, changed: true });
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let today = date(2024, 6, 1);
        let decision = advance(Some(state(7, today)), today);
        assert_eq!(decision, StreakDecision { streak: 7, changed: false });
    }

    #[test]
    fn test_next_day_extends() {
        let decision = advance(Some(state(7, date(2024, 6, 1))), date(2024, 6, 2));
        assert_eq!(decision, StreakDecision { streak: 8, changed: true });
    }

    #[test]
    fn test_one_missed_day_resets() {
        let decision = advance(Some(state(7, date(2024, 6, 1))), date(2024, 6, 3));
        assert_eq!(decision, StreakDecision { streak: 1, changed: true });
    }

    #[test]
    fn test_long_gap_resets() {
        let decision = advance(Some(state(30, date(2024, 1, 15))), date(2024, 6, 1));
        assert_eq!(decision, StreakDecision { streak: 1, changed: true });
    }

    #[test]
    fn test_stored_future_date_resets() {
        let today = date(2024, 6, 1);
        let future = today + Duration::days(3);
        let decision = advance(Some(state(4, future)), today);
        assert_eq!(decision, StreakDecision { streak: 1, changed: true });
    }

    #[test]
    fn test_extension_across_month_boundary() {
        let decision = advance(Some(state(2, date(2024, 1, 31))), date(2024, 2, 1));
        assert_eq!(decision, StreakDecision { streak: 3, changed: true });
    }

    #[test]
    fn test_extension_across_leap_day() {
        let decision = advance(Some(state(9, date(2024, 2, 28))), date(2024, 2, 29));
        assert_eq!(decision, StreakDecision { streak: 10, changed: true });
    }
}
