//! # calc_core - Calculator Engine
//!
//! `calc_core` is the computational heart of Abacus: it turns expression
//! text into numbers and numbers into display text. Hosts (the terminal
//! app, or any UI) pass strings in and get numbers or formatted strings
//! back; presentation and mutable state such as memory and history stay
//! on the host side.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **No `eval`**: Expressions go through an explicit grammar-driven parser
//! - **Rich Errors**: Structured error types, serializable to JSON
//! - **Total formatting**: Every `f64`, including NaN, has a display form
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::{evaluate, format_number};
//!
//! let value = evaluate("1200 × 1.5 + 12").unwrap();
//! assert_eq!(format_number(value), "1,812");
//!
//! // Division by zero surfaces as an error; hosts show "Error"
//! assert!(evaluate("1 ÷ 0").is_err());
//! ```
//!
//! ## Modules
//!
//! - [`expression`] - Glyph normalization, tokenizer and recursive-descent parser
//! - [`format`] - Display formatting (exponential, rounding, thousands separators)
//! - [`math`] - Factorial, combinatorics, gcd/lcm, primality, base and angle conversion
//! - [`scientific`] - Single-argument keypad functions and constants
//! - [`units`] - Length, weight, temperature and volume conversion
//! - [`settings`] - Host preferences stored as TOML
//! - [`errors`] - Structured error types

pub mod errors;
pub mod expression;
pub mod format;
pub mod math;
pub mod scientific;
pub mod settings;
pub mod units;

#[cfg(test)]
mod proptests;

// Re-export commonly used items at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use expression::{evaluate, Expression};
pub use format::{format_number, parse_display};
pub use math::{combination, convert_base, deg_to_rad, factorial, gcd, is_prime, lcm, permutation, rad_to_deg};
pub use scientific::{AngleMode, ScientificFunction};
pub use settings::Settings;
pub use units::{convert, Unit, UnitCategory};
