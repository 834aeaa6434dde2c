//! # Unit Conversion
//!
//! Conversion between common units of length, weight, temperature and
//! volume, for the converter panel that sits beside the calculator.
//!
//! Linear categories store one factor per unit: how many of that unit make
//! up one base unit (meter, kilogram, liter). Converting divides by the
//! source factor and multiplies by the target factor. Temperature is
//! affine and goes through Celsius instead.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{convert, Unit};
//!
//! let feet = convert(1.0, Unit::Meter, Unit::Foot).unwrap();
//! assert!((feet - 3.28084).abs() < 1e-9);
//!
//! let from: Unit = "°F".parse().unwrap();
//! let celsius = convert(212.0, from, Unit::Celsius).unwrap();
//! assert!((celsius - 100.0).abs() < 1e-9);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Categories
// ============================================================================

/// Physical quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Length,
    Weight,
    Temperature,
    Volume,
}

impl UnitCategory {
    /// All categories in display order
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Temperature,
        UnitCategory::Volume,
    ];

    /// Units in this category, in display order
    pub fn units(self) -> &'static [Unit] {
        match self {
            UnitCategory::Length => &[
                Unit::Meter,
                Unit::Foot,
                Unit::Inch,
                Unit::Centimeter,
                Unit::Kilometer,
                Unit::Mile,
            ],
            UnitCategory::Weight => &[Unit::Kilogram, Unit::Pound, Unit::Gram, Unit::Ounce, Unit::Ton],
            UnitCategory::Temperature => &[Unit::Celsius, Unit::Fahrenheit, Unit::Kelvin],
            UnitCategory::Volume => &[Unit::Liter, Unit::Gallon, Unit::Milliliter, Unit::Cup, Unit::Pint],
        }
    }

    /// The (from, to) pair selected when switching to this category
    pub fn default_pair(self) -> (Unit, Unit) {
        let units = self.units();
        (units[0], units[1])
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            UnitCategory::Length => "Length",
            UnitCategory::Weight => "Weight",
            UnitCategory::Temperature => "Temperature",
            UnitCategory::Volume => "Volume",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitCategory {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        UnitCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalcError::invalid_input("category", s, "expected length, weight, temperature or volume"))
    }
}

// ============================================================================
// Units
// ============================================================================

/// A convertible unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    // Length (base: meter)
    Meter,
    Foot,
    Inch,
    Centimeter,
    Kilometer,
    Mile,
    // Weight (base: kilogram)
    Kilogram,
    Pound,
    Gram,
    Ounce,
    Ton,
    // Temperature
    Celsius,
    Fahrenheit,
    Kelvin,
    // Volume (base: liter)
    Liter,
    Gallon,
    Milliliter,
    Cup,
    Pint,
}

impl Unit {
    /// Category this unit belongs to
    pub fn category(self) -> UnitCategory {
        match self {
            Unit::Meter | Unit::Foot | Unit::Inch | Unit::Centimeter | Unit::Kilometer | Unit::Mile => {
                UnitCategory::Length
            }
            Unit::Kilogram | Unit::Pound | Unit::Gram | Unit::Ounce | Unit::Ton => UnitCategory::Weight,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => UnitCategory::Temperature,
            Unit::Liter | Unit::Gallon | Unit::Milliliter | Unit::Cup | Unit::Pint => UnitCategory::Volume,
        }
    }

    /// Amount of this unit in one base unit of its category.
    ///
    /// Temperature units report 1.0; they are converted by [`convert`]
    /// through Celsius rather than by factor.
    pub fn factor(self) -> f64 {
        match self {
            Unit::Meter => 1.0,
            Unit::Foot => 3.28084,
            Unit::Inch => 39.3701,
            Unit::Centimeter => 100.0,
            Unit::Kilometer => 0.001,
            Unit::Mile => 0.000621371,
            Unit::Kilogram => 1.0,
            Unit::Pound => 2.20462,
            Unit::Gram => 1000.0,
            Unit::Ounce => 35.274,
            Unit::Ton => 0.001,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => 1.0,
            Unit::Liter => 1.0,
            Unit::Gallon => 0.264172,
            Unit::Milliliter => 1000.0,
            Unit::Cup => 4.22675,
            Unit::Pint => 2.11338,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Unit::Meter => "Meter",
            Unit::Foot => "Foot",
            Unit::Inch => "Inch",
            Unit::Centimeter => "Centimeter",
            Unit::Kilometer => "Kilometer",
            Unit::Mile => "Mile",
            Unit::Kilogram => "Kilogram",
            Unit::Pound => "Pound",
            Unit::Gram => "Gram",
            Unit::Ounce => "Ounce",
            Unit::Ton => "Ton",
            Unit::Celsius => "Celsius",
            Unit::Fahrenheit => "Fahrenheit",
            Unit::Kelvin => "Kelvin",
            Unit::Liter => "Liter",
            Unit::Gallon => "Gallon",
            Unit::Milliliter => "Milliliter",
            Unit::Cup => "Cup",
            Unit::Pint => "Pint",
        }
    }

    /// Accepted spellings besides the display name (plurals and symbols)
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Unit::Meter => &["meters", "metre", "metres", "m"],
            Unit::Foot => &["feet", "ft"],
            Unit::Inch => &["inches", "in"],
            Unit::Centimeter => &["centimeters", "centimetre", "centimetres", "cm"],
            Unit::Kilometer => &["kilometers", "kilometre", "kilometres", "km"],
            Unit::Mile => &["miles", "mi"],
            Unit::Kilogram => &["kilograms", "kg"],
            Unit::Pound => &["pounds", "lb", "lbs"],
            Unit::Gram => &["grams", "g"],
            Unit::Ounce => &["ounces", "oz"],
            Unit::Ton => &["tons", "tonne", "tonnes", "t"],
            Unit::Celsius => &["c", "°c"],
            Unit::Fahrenheit => &["f", "°f"],
            Unit::Kelvin => &["k"],
            Unit::Liter => &["liters", "litre", "litres", "l"],
            Unit::Gallon => &["gallons", "gal"],
            Unit::Milliliter => &["milliliters", "millilitre", "millilitres", "ml"],
            Unit::Cup => &["cups"],
            Unit::Pint => &["pints", "pt"],
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercased spelling -> unit
static UNIT_LOOKUP: Lazy<HashMap<String, Unit>> = Lazy::new(|| {
    let mut lookup = HashMap::new();
    for category in UnitCategory::ALL {
        for &unit in category.units() {
            lookup.insert(unit.name().to_lowercase(), unit);
            for alias in unit.aliases() {
                lookup.insert(alias.to_lowercase(), unit);
            }
        }
    }
    lookup
});

impl FromStr for Unit {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        UNIT_LOOKUP
            .get(&s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| CalcError::unknown_unit(s.trim()))
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert `value` from one unit to another in the same category.
///
/// # Errors
///
/// * `InvalidInput` if `value` is infinite or NaN
/// * `IncompatibleUnits` if the units measure different quantities
pub fn convert(value: f64, from: Unit, to: Unit) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input("value", value.to_string(), "value must be finite"));
    }
    if from.category() != to.category() {
        return Err(CalcError::IncompatibleUnits {
            from: from.name().to_string(),
            to: to.name().to_string(),
        });
    }

    let converted = match from.category() {
        UnitCategory::Temperature => celsius_to(to, to_celsius(from, value)),
        _ => value / from.factor() * to.factor(),
    };

    debug!(value, from = from.name(), to = to.name(), converted, "converted units");
    Ok(converted)
}

fn to_celsius(unit: Unit, value: f64) -> f64 {
    match unit {
        Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        Unit::Kelvin => value - 273.15,
        _ => value,
    }
}

fn celsius_to(unit: Unit, celsius: f64) -> f64 {
    match unit {
        Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        Unit::Kelvin => celsius + 273.15,
        _ => celsius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-6, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_length_conversion() {
        assert_close(convert(1.0, Unit::Meter, Unit::Foot).unwrap(), 3.28084);
        assert_close(convert(250.0, Unit::Centimeter, Unit::Meter).unwrap(), 2.5);
        assert_close(convert(5.0, Unit::Kilometer, Unit::Meter).unwrap(), 5000.0);
        assert_close(convert(12.0, Unit::Inch, Unit::Foot).unwrap(), 12.0 / 39.3701 * 3.28084);
    }

    #[test]
    fn test_weight_and_volume_conversion() {
        assert_close(convert(1.0, Unit::Kilogram, Unit::Pound).unwrap(), 2.20462);
        assert_close(convert(500.0, Unit::Gram, Unit::Kilogram).unwrap(), 0.5);
        assert_close(convert(2.0, Unit::Liter, Unit::Milliliter).unwrap(), 2000.0);
        assert_close(convert(1.0, Unit::Gallon, Unit::Liter).unwrap(), 1.0 / 0.264172);
    }

    #[test]
    fn test_temperature_conversion() {
        assert_close(convert(32.0, Unit::Fahrenheit, Unit::Celsius).unwrap(), 0.0);
        assert_close(convert(100.0, Unit::Celsius, Unit::Fahrenheit).unwrap(), 212.0);
        assert_close(convert(0.0, Unit::Kelvin, Unit::Celsius).unwrap(), -273.15);
        assert_close(convert(-40.0, Unit::Fahrenheit, Unit::Celsius).unwrap(), -40.0);
        assert_close(convert(300.0, Unit::Kelvin, Unit::Fahrenheit).unwrap(), 80.33);
    }

    #[test]
    fn test_same_unit_is_identity() {
        for category in UnitCategory::ALL {
            for &unit in category.units() {
                assert_close(convert(42.5, unit, unit).unwrap(), 42.5);
            }
        }
    }

    #[test]
    fn test_incompatible_units() {
        let err = convert(1.0, Unit::Meter, Unit::Pound).unwrap_err();
        assert_eq!(err.error_code(), "INCOMPATIBLE_UNITS");
        assert!(convert(f64::NAN, Unit::Meter, Unit::Foot).is_err());
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("Feet".parse::<Unit>().unwrap(), Unit::Foot);
        assert_eq!(" ft ".parse::<Unit>().unwrap(), Unit::Foot);
        assert_eq!("KM".parse::<Unit>().unwrap(), Unit::Kilometer);
        assert_eq!("°F".parse::<Unit>().unwrap(), Unit::Fahrenheit);
        assert_eq!("lbs".parse::<Unit>().unwrap(), Unit::Pound);
        assert_eq!("furlong".parse::<Unit>().unwrap_err().error_code(), "UNKNOWN_UNIT");
    }

    #[test]
    fn test_categories() {
        assert_eq!(UnitCategory::Length.default_pair(), (Unit::Meter, Unit::Foot));
        assert_eq!(UnitCategory::Temperature.default_pair(), (Unit::Celsius, Unit::Fahrenheit));
        for category in UnitCategory::ALL {
            assert!(category.units().iter().all(|u| u.category() == category));
        }
        assert_eq!("volume".parse::<UnitCategory>().unwrap(), UnitCategory::Volume);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Unit::Fahrenheit).unwrap();
        assert_eq!(json, "\"fahrenheit\"");
        let unit: Unit = serde_json::from_str("\"cup\"").unwrap();
        assert_eq!(unit, Unit::Cup);
    }
}
