//! # Display Formatting
//!
//! Converts numeric results into bounded-length display text.
//!
//! [`format_number`] applies these rules in order:
//!
//! 1. Non-finite values render as `"Error"`.
//! 2. Magnitudes `>= 1e12`, or non-zero magnitudes `< 1e-6`, use
//!    exponential notation with six mantissa decimals (`1.234500e+13`).
//! 3. Everything else is rounded to 12 significant digits and printed in
//!    its shortest decimal form.
//! 4. Magnitudes `>= 1000` get `,` thousands separators in the integer part.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::format::format_number;
//!
//! assert_eq!(format_number(1234567.0), "1,234,567");
//! assert_eq!(format_number(0.1 + 0.2), "0.3");
//! assert_eq!(format_number(1e13), "1.000000e+13");
//! assert_eq!(format_number(f64::INFINITY), "Error");
//! ```

use crate::errors::{CalcError, CalcResult};
use crate::expression::normalize;

/// Text shown for any value that cannot be displayed
pub const ERROR_TEXT: &str = "Error";

/// Magnitudes at or above this switch to exponential notation
pub const EXPONENTIAL_UPPER: f64 = 1e12;

/// Non-zero magnitudes below this switch to exponential notation
pub const EXPONENTIAL_LOWER: f64 = 1e-6;

/// Significant digits kept in plain decimal output
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Mantissa decimals in exponential output
pub const EXPONENTIAL_DIGITS: usize = 6;

/// Format a value for the calculator display.
///
/// Total over all `f64` inputs, including NaN and the infinities.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_TEXT.to_string();
    }
    if value == 0.0 {
        // Covers -0.0 as well
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENTIAL_UPPER || magnitude < EXPONENTIAL_LOWER {
        return to_exponential(value, EXPONENTIAL_DIGITS);
    }

    let plain = to_significant(value, SIGNIFICANT_DIGITS);
    if magnitude >= 1000.0 {
        group_thousands(&plain)
    } else {
        plain
    }
}

/// Fixed-point rendering with `decimals` fractional digits.
///
/// ```rust
/// use calc_core::format::format_fixed;
///
/// assert_eq!(format_fixed(3.280839895, 4), "3.2808");
/// assert_eq!(format_fixed(f64::NAN, 4), "Error");
/// ```
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return ERROR_TEXT.to_string();
    }
    format!("{:.*}", decimals, value)
}

/// Parse display text back into a number.
///
/// Accepts everything [`format_number`] produces except `"Error"`:
/// thousands separators are stripped and the exponential form is accepted.
///
/// ```rust
/// use calc_core::format::{format_number, parse_display};
///
/// assert_eq!(parse_display("1,234,567").unwrap(), 1234567.0);
/// assert_eq!(parse_display(&format_number(1.5e13)).unwrap(), 1.5e13);
/// assert!(parse_display("Error").is_err());
/// ```
pub fn parse_display(text: &str) -> CalcResult<f64> {
    let trimmed = text.trim();
    let cleaned: String = normalize(trimmed).chars().filter(|&c| c != ',').collect();

    let is_numeric = !cleaned.is_empty()
        && cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !is_numeric {
        return Err(CalcError::invalid_expression(trimmed, "not a displayed number"));
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(CalcError::invalid_expression(trimmed, "value is not finite")),
        Err(e) => Err(CalcError::invalid_expression(trimmed, e.to_string())),
    }
}

/// Exponential notation with an explicitly signed exponent (`e+13`, `e-7`).
fn to_exponential(value: f64, digits: usize) -> String {
    let formatted = format!("{:.*e}", digits, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Round to `digits` significant digits, then print the shortest decimal
/// that round-trips. Only called for magnitudes in `[1e-6, 1e12)`, where
/// `f64`'s `Display` never switches to exponential form.
fn to_significant(value: f64, digits: usize) -> String {
    let rounded = format!("{:.*e}", digits.saturating_sub(1), value)
        .parse::<f64>()
        .unwrap_or(value);
    format!("{}", rounded)
}

/// Insert `,` every three digits of the integer part.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "Error");
        assert_eq!(format_number(f64::NEG_INFINITY), "Error");
        assert_eq!(format_number(f64::NAN), "Error");
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(123456789.123456), "123,456,789.123");
        assert_eq!(format_number(100000.25), "100,000.25");
    }

    #[test]
    fn test_exponential_large() {
        assert_eq!(format_number(1e13), "1.000000e+13");
        assert_eq!(format_number(1.2345e13), "1.234500e+13");
        assert_eq!(format_number(-2.5e15), "-2.500000e+15");
        assert_eq!(format_number(1e12), "1.000000e+12");
    }

    #[test]
    fn test_exponential_small() {
        assert_eq!(format_number(5e-7), "5.000000e-7");
        assert_eq!(format_number(-1.5e-9), "-1.500000e-9");
        // Lower threshold itself stays in plain form
        assert_eq!(format_number(1e-6), "0.000001");
    }

    #[test]
    fn test_significant_digit_rounding() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.333333333333");
        assert_eq!(format_number(2.0 / 3.0), "0.666666666667");
        assert_eq!(format_number(2.50), "2.5");
        assert_eq!(format_number(42.0), "42");
    }

    #[test]
    fn test_rounding_can_cross_into_grouping() {
        // Rounds up to 1e12 in plain form; grouping follows the input magnitude
        assert_eq!(format_number(999_999_999_999.9), "1,000,000,000,000");
        // Below 1000 before rounding, so no separator is added
        assert_eq!(format_number(999.9999999999999), "1000");
    }

    #[test]
    fn test_output_is_bounded() {
        for value in [1.0 / 7.0, 123_456_789_012.345, -987_654.321_987_654, 3e-6, 7e200, -4e-300] {
            assert!(format_number(value).len() <= 20, "{} -> {}", value, format_number(value));
        }
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(1.0, 4), "1.0000");
        assert_eq!(format_fixed(-0.12345, 2), "-0.12");
        assert_eq!(format_fixed(f64::INFINITY, 4), "Error");
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("0").unwrap(), 0.0);
        assert_eq!(parse_display("-1,234.5").unwrap(), -1234.5);
        assert_eq!(parse_display("−7").unwrap(), -7.0);
        assert_eq!(parse_display(" 5.000000e-7 ").unwrap(), 5e-7);
        assert!(parse_display("").is_err());
        assert!(parse_display("Error").is_err());
        assert!(parse_display("inf").is_err());
        assert!(parse_display("NaN").is_err());
        assert!(parse_display("1 + 2").is_err());
    }

    #[test]
    fn test_parse_display_inverts_format() {
        for value in [0.5, 1234567.0, -42.125, 1.5e13, 2.5e-8] {
            assert_eq!(parse_display(&format_number(value)).unwrap(), value);
        }
    }
}
