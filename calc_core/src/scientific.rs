//! # Scientific Functions
//!
//! Single-argument functions a host applies to the value currently on the
//! display (the scientific keypad: `sin`, `log`, `√`, `x²`, `n!`, ...),
//! plus the constants `π` and `e`.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::scientific::{AngleMode, ScientificFunction};
//!
//! let sin: ScientificFunction = "sin".parse().unwrap();
//! let value = sin.apply(30.0, AngleMode::Degrees).unwrap();
//! assert!((value - 0.5).abs() < 1e-12);
//!
//! let root: ScientificFunction = "√".parse().unwrap();
//! assert_eq!(root.apply(16.0, AngleMode::Degrees).unwrap(), 4.0);
//! ```

use std::f64::consts;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::math::{deg_to_rad, factorial};

/// How trigonometric functions interpret their argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// Convert an angle in this mode to radians
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleMode::Degrees => deg_to_rad(angle),
            AngleMode::Radians => angle,
        }
    }
}

impl FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleMode::Degrees),
            "rad" | "radian" | "radians" => Ok(AngleMode::Radians),
            _ => Err(CalcError::invalid_input("angle_mode", s, "expected 'degrees' or 'radians'")),
        }
    }
}

/// A single-argument scientific function or constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScientificFunction {
    Sin,
    Cos,
    Tan,
    /// Base-10 logarithm
    Log,
    /// Natural logarithm
    Ln,
    Sqrt,
    Square,
    /// Reciprocal, `1/x`
    Inverse,
    /// `n!` of the floored argument
    Factorial,
    /// `x / 100`
    Percent,
    /// The constant π; ignores its argument
    Pi,
    /// Euler's number; ignores its argument
    E,
}

impl ScientificFunction {
    /// Every function, in keypad order
    pub const ALL: [ScientificFunction; 12] = [
        ScientificFunction::Sin,
        ScientificFunction::Cos,
        ScientificFunction::Tan,
        ScientificFunction::Log,
        ScientificFunction::Ln,
        ScientificFunction::Sqrt,
        ScientificFunction::Square,
        ScientificFunction::Inverse,
        ScientificFunction::Factorial,
        ScientificFunction::Percent,
        ScientificFunction::Pi,
        ScientificFunction::E,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Log => "log",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Sqrt => "sqrt",
            ScientificFunction::Square => "square",
            ScientificFunction::Inverse => "inverse",
            ScientificFunction::Factorial => "factorial",
            ScientificFunction::Percent => "percent",
            ScientificFunction::Pi => "pi",
            ScientificFunction::E => "e",
        }
    }

    /// Keypad label
    pub fn label(self) -> &'static str {
        match self {
            ScientificFunction::Sin => "sin",
            ScientificFunction::Cos => "cos",
            ScientificFunction::Tan => "tan",
            ScientificFunction::Log => "log",
            ScientificFunction::Ln => "ln",
            ScientificFunction::Sqrt => "√",
            ScientificFunction::Square => "x²",
            ScientificFunction::Inverse => "1/x",
            ScientificFunction::Factorial => "n!",
            ScientificFunction::Percent => "%",
            ScientificFunction::Pi => "π",
            ScientificFunction::E => "e",
        }
    }

    /// True for constants, which do not read the current value
    pub fn is_constant(self) -> bool {
        matches!(self, ScientificFunction::Pi | ScientificFunction::E)
    }

    /// Apply the function to `value`.
    ///
    /// # Errors
    ///
    /// * `DomainError` if the result is infinite or NaN (`ln(0)`, `√-1`, `1/0`, ...)
    /// * Factorial errors from [`crate::math::factorial`]
    pub fn apply(self, value: f64, angle_mode: AngleMode) -> CalcResult<f64> {
        let result = match self {
            ScientificFunction::Sin => angle_mode.to_radians(value).sin(),
            ScientificFunction::Cos => angle_mode.to_radians(value).cos(),
            ScientificFunction::Tan => angle_mode.to_radians(value).tan(),
            ScientificFunction::Log => value.log10(),
            ScientificFunction::Ln => value.ln(),
            ScientificFunction::Sqrt => value.sqrt(),
            ScientificFunction::Square => value * value,
            ScientificFunction::Inverse => 1.0 / value,
            ScientificFunction::Factorial => {
                if !value.is_finite() {
                    return Err(CalcError::domain("factorial", "argument must be finite"));
                }
                // Saturating cast; anything beyond i64 is caught by the range guard
                factorial(value.floor() as i64)?
            }
            ScientificFunction::Percent => value / 100.0,
            ScientificFunction::Pi => consts::PI,
            ScientificFunction::E => consts::E,
        };

        if !result.is_finite() {
            return Err(CalcError::domain(
                self.name(),
                format!("no finite result for {}", value),
            ));
        }
        Ok(result)
    }
}

impl fmt::Display for ScientificFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScientificFunction {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let key = s.trim().to_lowercase();
        let func = match key.as_str() {
            "sin" => ScientificFunction::Sin,
            "cos" => ScientificFunction::Cos,
            "tan" => ScientificFunction::Tan,
            "log" | "log10" => ScientificFunction::Log,
            "ln" => ScientificFunction::Ln,
            "sqrt" | "√" => ScientificFunction::Sqrt,
            "square" | "sqr" | "x²" | "x^2" => ScientificFunction::Square,
            "inverse" | "inv" | "1/x" => ScientificFunction::Inverse,
            "factorial" | "fact" | "n!" | "!" => ScientificFunction::Factorial,
            "percent" | "%" => ScientificFunction::Percent,
            "pi" | "π" => ScientificFunction::Pi,
            "e" => ScientificFunction::E,
            _ => {
                return Err(CalcError::invalid_input(
                    "function",
                    s,
                    "unknown scientific function",
                ))
            }
        };
        Ok(func)
    }
}
