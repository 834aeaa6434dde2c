//! # Discrete Math Helpers
//!
//! Pure functions behind the scientific-mode buttons: factorial,
//! combinations, permutations, gcd/lcm, primality, positional base
//! conversion and angle conversion.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::math::{factorial, gcd, is_prime, convert_base};
//!
//! assert_eq!(factorial(5).unwrap(), 120.0);
//! assert_eq!(gcd(12.0, 18.0).unwrap(), 6.0);
//! assert!(is_prime(17));
//! assert_eq!(convert_base("255", 10, 16).unwrap(), "FF");
//! ```

use std::f64::consts::PI;

use crate::errors::{CalcError, CalcResult};

/// Largest n whose factorial fits in an f64
pub const MAX_FACTORIAL: i64 = 170;

/// Smallest supported numeral base
pub const MIN_BASE: u32 = 2;

/// Largest supported numeral base (digits 0-9 then A-Z)
pub const MAX_BASE: u32 = 36;

/// n! for `0 <= n <= 170`.
///
/// # Errors
///
/// * `DomainError` if `n < 0`
/// * `RangeError` if `n > 170`
pub fn factorial(n: i64) -> CalcResult<f64> {
    if n < 0 {
        return Err(CalcError::domain("factorial", format!("n must be non-negative, got {}", n)));
    }
    if n > MAX_FACTORIAL {
        return Err(CalcError::range(
            "factorial",
            format!("{}! exceeds the largest representable number (max n = {})", n, MAX_FACTORIAL),
        ));
    }

    Ok((2..=n).fold(1.0, |acc, i| acc * i as f64))
}

/// Number of ways to choose `r` items from `n`, ignoring order.
///
/// Uses the multiplicative formula, so results stay exact while they fit
/// in 53 bits and moderately large `n` does not overflow early.
///
/// ```rust
/// use calc_core::math::combination;
///
/// assert_eq!(combination(5, 2).unwrap(), 10.0);
/// assert_eq!(combination(200, 3).unwrap(), 1_313_400.0);
/// ```
pub fn combination(n: i64, r: i64) -> CalcResult<f64> {
    check_choose_args("combination", n, r)?;

    let r = r.min(n - r);
    let mut result = 1.0_f64;
    for i in 1..=r {
        result = finite_count("combination", n, r, result * (n - r + i) as f64 / i as f64)?;
    }

    Ok(result.round())
}

/// Number of ordered arrangements of `r` items taken from `n`.
pub fn permutation(n: i64, r: i64) -> CalcResult<f64> {
    check_choose_args("permutation", n, r)?;

    // Counts down from n so that n = i64::MAX does not overflow the range
    let mut result = 1.0_f64;
    for i in 0..r {
        result = finite_count("permutation", n, r, result * (n - i) as f64)?;
    }

    Ok(result)
}

fn check_choose_args(function: &str, n: i64, r: i64) -> CalcResult<()> {
    if r < 0 || r > n {
        return Err(CalcError::domain(
            function,
            format!("r must satisfy 0 <= r <= n, got n = {}, r = {}", n, r),
        ));
    }
    Ok(())
}

fn finite_count(function: &str, n: i64, r: i64, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::range(
            function,
            format!("result for n = {}, r = {} exceeds the largest representable number", n, r),
        ));
    }
    Ok(value)
}

/// Greatest common divisor of `|floor(a)|` and `|floor(b)|`.
///
/// # Errors
///
/// `DomainError` for infinite or NaN arguments.
pub fn gcd(a: f64, b: f64) -> CalcResult<f64> {
    let mut a = integer_magnitude("gcd", a)?;
    let mut b = integer_magnitude("gcd", b)?;

    while b != 0.0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }

    Ok(a)
}

/// Least common multiple of `|floor(a)|` and `|floor(b)|`.
///
/// ```rust
/// use calc_core::math::lcm;
///
/// assert_eq!(lcm(4.0, 6.0).unwrap(), 12.0);
/// assert_eq!(lcm(0.0, 5.0).unwrap(), 0.0);
/// assert!(lcm(0.0, 0.0).is_err());
/// ```
pub fn lcm(a: f64, b: f64) -> CalcResult<f64> {
    let a = integer_magnitude("lcm", a)?;
    let b = integer_magnitude("lcm", b)?;
    if a == 0.0 && b == 0.0 {
        return Err(CalcError::domain("lcm", "lcm(0, 0) is undefined"));
    }

    // Divide before multiplying to keep the intermediate small
    let divisor = gcd(a, b)?;
    let result = a / divisor * b;
    if !result.is_finite() {
        return Err(CalcError::range("lcm", "result exceeds the largest representable number"));
    }
    Ok(result)
}

fn integer_magnitude(function: &str, x: f64) -> CalcResult<f64> {
    if !x.is_finite() {
        return Err(CalcError::domain(function, format!("argument must be finite, got {}", x)));
    }
    Ok(x.floor().abs())
}

/// Trial-division primality test.
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut candidate: i64 = 3;
    while candidate <= n / candidate {
        if n % candidate == 0 {
            return false;
        }
        candidate += 2;
    }
    true
}

/// Reinterpret an integer digit string from `from_base` into `to_base`.
///
/// Digits are `0-9` then `A-Z` (input is case-insensitive, output is
/// uppercase). A leading `-` is preserved.
///
/// ```rust
/// use calc_core::math::convert_base;
///
/// let hex = convert_base("255", 10, 16).unwrap();
/// assert_eq!(hex, "FF");
/// assert_eq!(convert_base(&hex, 16, 10).unwrap(), "255");
/// assert_eq!(convert_base("-1010", 2, 10).unwrap(), "-10");
/// ```
///
/// # Errors
///
/// * `DomainError` for a base outside 2-36, empty input, or a digit not
///   valid in `from_base`
/// * `RangeError` if the value does not fit in 128 bits
pub fn convert_base(digits: &str, from_base: u32, to_base: u32) -> CalcResult<String> {
    for base in [from_base, to_base] {
        if !(MIN_BASE..=MAX_BASE).contains(&base) {
            return Err(CalcError::domain(
                "convert_base",
                format!("base must be between {} and {}, got {}", MIN_BASE, MAX_BASE, base),
            ));
        }
    }

    let trimmed = digits.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return Err(CalcError::domain("convert_base", "no digits to convert"));
    }

    let mut value: u128 = 0;
    for c in body.chars() {
        let digit = c.to_digit(from_base).ok_or_else(|| {
            CalcError::domain(
                "convert_base",
                format!("'{}' is not a valid base-{} digit", c, from_base),
            )
        })?;
        value = value
            .checked_mul(from_base as u128)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or_else(|| CalcError::range("convert_base", format!("'{}' is too large to convert", trimmed)))?;
    }

    let mut out = Vec::new();
    loop {
        let digit = (value % to_base as u128) as u32;
        // digit < to_base <= 36, so from_digit always succeeds
        out.push(std::char::from_digit(digit, to_base).unwrap_or('?').to_ascii_uppercase());
        value /= to_base as u128;
        if value == 0 {
            break;
        }
    }

    if negative && out.iter().any(|&c| c != '0') {
        out.push('-');
    }
    Ok(out.iter().rev().collect())
}

/// Degrees to radians
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * (PI / 180.0)
}

/// Radians to degrees
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * (180.0 / PI)
}
