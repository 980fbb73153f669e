//! Billing math shared by check-in, stay revision, and checkout.
//!
//! A stay is billed per night, where `nights = max(1, ceil(duration in
//! days))`. A same-day departure still bills one night; a 25-hour stay
//! bills two. Stays without an expected departure default to one night
//! until revised.

use crate::errors::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};

const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/// Longest stay window accepted at check-in or revision, in days.
pub const MAX_STAY_DAYS: i64 = 365;

/// Number of billable nights between two instants: the ceiling of the exact
/// duration in days, floored at one night.
///
/// Millisecond resolution, so a stay even a fraction past a whole number of
/// days rounds up to the next night.
#[must_use]
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    let millis = (check_out - check_in).num_milliseconds();
    // Ceiling division; equivalent to `millis.div_ceil(MILLISECONDS_PER_DAY)`
    // for all inputs (including negative durations), written with stable ops.
    (millis + MILLISECONDS_PER_DAY - 1)
        .div_euclid(MILLISECONDS_PER_DAY)
        .max(1)
}

/// Billable nights for a stay, defaulting to one night when no expected
/// departure has been given.
#[must_use]
pub fn nights_for_stay(check_in: DateTime<Utc>, expected_check_out: Option<DateTime<Utc>>) -> i64 {
    expected_check_out.map_or(1, |out| nights_between(check_in, out))
}

/// Billed total for a stay.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn total_for(rate: f64, nights: i64) -> f64 {
    rate * nights as f64
}

/// Validates an expected departure against the check-in instant: it must be
/// strictly after check-in and no more than [`MAX_STAY_DAYS`] days later.
///
/// # Errors
/// Returns a validation error naming `expected_check_out` when the window
/// is empty, inverted, or longer than the allowed horizon.
pub fn validate_stay_window(
    check_in: DateTime<Utc>,
    expected_check_out: DateTime<Utc>,
) -> Result<()> {
    if expected_check_out <= check_in {
        return Err(Error::Validation {
            field: "expected_check_out",
            message: format!("must be strictly after check-in ({check_in})"),
        });
    }

    // Compare full instants: truncating the duration to whole days would
    // let a departure a few hours past the horizon slip through
    if expected_check_out > check_in + TimeDelta::days(MAX_STAY_DAYS) {
        return Err(Error::Validation {
            field: "expected_check_out",
            message: format!("stay cannot exceed {MAX_STAY_DAYS} days"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::TimeDelta;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-10T14:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_same_day_bills_one_night() {
        let out = t0() + TimeDelta::hours(3);
        assert_eq!(nights_between(t0(), out), 1);
    }

    #[test]
    fn test_exact_days_are_not_rounded_up() {
        assert_eq!(nights_between(t0(), t0() + TimeDelta::days(2)), 2);
        assert_eq!(nights_between(t0(), t0() + TimeDelta::days(1)), 1);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        // 25 hours crosses into a second billable day
        assert_eq!(nights_between(t0(), t0() + TimeDelta::hours(25)), 2);
        assert_eq!(nights_between(t0(), t0() + TimeDelta::hours(47)), 2);
        assert_eq!(nights_between(t0(), t0() + TimeDelta::hours(49)), 3);
    }

    #[test]
    fn test_zero_or_negative_duration_floors_at_one() {
        assert_eq!(nights_between(t0(), t0()), 1);
        assert_eq!(nights_between(t0(), t0() - TimeDelta::hours(5)), 1);
    }

    #[test]
    fn test_no_expected_departure_defaults_to_one_night() {
        assert_eq!(nights_for_stay(t0(), None), 1);
        assert_eq!(
            nights_for_stay(t0(), Some(t0() + TimeDelta::days(3))),
            3
        );
    }

    #[test]
    fn test_total_for() {
        assert_eq!(total_for(1000.0, 2), 2000.0);
        assert_eq!(total_for(750.5, 1), 750.5);
    }

    #[test]
    fn test_stay_window_must_be_after_check_in() {
        assert!(validate_stay_window(t0(), t0()).is_err());
        assert!(validate_stay_window(t0(), t0() - TimeDelta::days(1)).is_err());
        assert!(validate_stay_window(t0(), t0() + TimeDelta::hours(1)).is_ok());
    }

    #[test]
    fn test_stay_window_horizon() {
        assert!(validate_stay_window(t0(), t0() + TimeDelta::days(365)).is_ok());
        let result = validate_stay_window(t0(), t0() + TimeDelta::days(366));
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "expected_check_out",
                ..
            }
        ));

        // A fractional day past the horizon is still past the horizon
        let result =
            validate_stay_window(t0(), t0() + TimeDelta::days(365) + TimeDelta::hours(5));
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "expected_check_out",
                ..
            }
        ));
    }

    #[test]
    fn test_sub_second_remainder_still_rounds_up() {
        let out = t0() + TimeDelta::days(2) + TimeDelta::milliseconds(300);
        assert_eq!(nights_between(t0(), out), 3);
    }
}
