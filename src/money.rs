//! Currency conversion and display.
//!
//! Amounts arrive from JSON as major units (dollars) in `f64`. They are
//! converted once into integer minor units (cents) and every later step
//! works on integers.

/// Largest magnitude, in cents, that an `f64` still represents exactly.
const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

/// Converts a major-unit amount into minor units, rounding half up on the
/// cents boundary.
///
/// Returns `None` for NaN, infinities, and magnitudes too large to convert
/// exactly.
///
/// ```
/// use beam_site::money::to_minor_units;
///
/// assert_eq!(to_minor_units(19.999), Some(2000));
/// assert_eq!(to_minor_units(25.5), Some(2550));
/// assert_eq!(to_minor_units(f64::NAN), None);
/// ```
#[must_use]
pub fn to_minor_units(amount: f64) -> Option<i64> {
    if !amount.is_finite() {
        return None;
    }
    #[expect(
        clippy::float_arithmetic,
        reason = "amounts arrive as JSON numbers and are scaled exactly once"
    )]
    let scaled = amount * 100.0;
    // `round` breaks ties away from zero, which is half-up for the
    // non-negative amounts this is used with.
    let rounded = scaled.round();
    if rounded.abs() > MAX_EXACT_CENTS {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounded is integral and bounded by MAX_EXACT_CENTS"
    )]
    Some(rounded as i64)
}

/// Formats minor units as US dollars with thousands separators.
///
/// Whole-dollar amounts omit the cents.
///
/// ```
/// use beam_site::money::format_usd;
///
/// assert_eq!(format_usd(500_000), "$5,000");
/// assert_eq!(format_usd(1_250), "$12.50");
/// assert_eq!(format_usd(-99), "-$0.99");
/// ```
#[must_use]
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    let dollars = group_thousands(&magnitude.div_euclid(100).to_string());
    let remainder = magnitude.rem_euclid(100);
    if remainder == 0 {
        format!("{sign}${dollars}")
    } else {
        format!("{sign}${dollars}.{remainder:02}")
    }
}

/// Formats a major-unit amount as US dollars, or `"$0"` when it cannot be
/// represented.
#[must_use]
pub fn format_dollars(amount: f64) -> String {
    format_usd(to_minor_units(amount).unwrap_or(0))
}

fn group_thousands(digits: &str) -> String {
    let length = digits.len();
    let mut grouped = String::with_capacity(length.saturating_add(length.div_euclid(3)));
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && length.saturating_sub(index).rem_euclid(3) == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
