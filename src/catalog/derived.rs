//! Pure display values derived from records.

use chrono::NaiveDate;

/// Share of `target` reached by `current`, as a percentage clamped to
/// `[0, 100]`.
///
/// A target that is zero, negative, or NaN yields `0.0`, as does a NaN
/// `current`. Over-funded records are valid data and simply show 100%.
///
/// ```
/// use beam_site::catalog::percentage;
///
/// assert_eq!(percentage(2_500.0, 10_000.0), 25.0);
/// assert_eq!(percentage(15_000.0, 10_000.0), 100.0);
/// assert_eq!(percentage(40.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn percentage(current: f64, target: f64) -> f64 {
    if current.is_nan() || target.is_nan() || target <= 0.0 {
        return 0.0;
    }
    #[expect(
        clippy::float_arithmetic,
        reason = "progress ratios are inherently fractional"
    )]
    let ratio = current / target * 100.0;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 100.0)
}

/// Parses the calendar date at the start of a stored date or timestamp.
///
/// Only the leading `YYYY-MM-DD` is read; any time or offset that follows
/// is ignored, so no timezone conversion can shift the day.
#[must_use]
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Renders a stored date as `Mon D, YYYY` (for example `Mar 5, 2025`).
///
/// Values that do not start with a calendar date are returned unchanged.
#[must_use]
pub fn format_calendar_date(raw: &str) -> String {
    parse_calendar_date(raw).map_or_else(
        || raw.to_owned(),
        |date| date.format("%b %-d, %Y").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::{format_calendar_date, percentage};

    #[rstest]
    #[case::quarter(25.0, 100.0, 25.0)]
    #[case::over_target(150.0, 100.0, 100.0)]
    #[case::zero_target(10.0, 0.0, 0.0)]
    #[case::negative_target(10.0, -5.0, 0.0)]
    #[case::negative_current(-10.0, 100.0, 0.0)]
    #[case::nan_current(f64::NAN, 100.0, 0.0)]
    #[case::infinite_current(f64::INFINITY, 100.0, 100.0)]
    #[case::infinite_target(f64::INFINITY, f64::INFINITY, 0.0)]
    fn percentage_is_clamped(#[case] current: f64, #[case] target: f64, #[case] expected: f64) {
        assert!(
            (percentage(current, target) - expected).abs() < f64::EPSILON,
            "percentage({current}, {target}) should be {expected}"
        );
    }

    #[rstest]
    #[case::date_only("2025-03-05", "Mar 5, 2025")]
    #[case::utc_timestamp("2024-12-31T23:30:00Z", "Dec 31, 2024")]
    #[case::offset_timestamp("2024-01-01T00:15:00+05:00", "Jan 1, 2024")]
    #[case::postgres_timestamp("2024-07-04 18:00:00.123+00", "Jul 4, 2024")]
    #[case::not_a_date("next spring", "next spring")]
    #[case::empty("", "")]
    fn formats_calendar_dates(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_calendar_date(raw), expected);
    }

    proptest! {
        #[test]
        fn percentage_stays_in_bounds(current in -1.0e9_f64..1.0e9, target in 0.001_f64..1.0e9) {
            let value = percentage(current, target);
            prop_assert!((0.0..=100.0).contains(&value));
        }

        #[test]
        fn percentage_is_monotonic_in_current(
            low in 0.0_f64..1.0e6,
            step in 0.0_f64..1.0e6,
            target in 0.001_f64..1.0e6,
        ) {
            let high = low + step;
            prop_assert!(percentage(low, target) <= percentage(high, target));
        }

        #[test]
        fn zero_target_is_always_zero(current in proptest::num::f64::ANY) {
            prop_assert_eq!(percentage(current, 0.0), 0.0);
        }
    }
}
