//! Command-line surface.
//!
//! Each subcommand wraps one `calc_core` operation and prints either the
//! display text or, with `--json`, a JSON object. With no subcommand the
//! interactive session starts.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_core::format::format_fixed;
use calc_core::settings::{default_settings_path, load_settings, load_settings_or_default};
use calc_core::{
    combination, convert, convert_base, deg_to_rad, evaluate, factorial, format_number, gcd, is_prime, lcm,
    parse_display, permutation, rad_to_deg, AngleMode, ScientificFunction, Settings, Unit,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};

use crate::repl;
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "abacus",
    version,
    about = "Calculator: expression evaluation, scientific functions and unit conversion"
)]
pub struct Cli {
    /// Settings file (TOML). Defaults to <config dir>/abacus/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run; starts the interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate an arithmetic expression, e.g. `abacus eval "(2 + 3) × 4"`
    Eval {
        /// Expression; multiple words are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        expression: Vec<String>,

        /// Print the unformatted f64 instead of display text
        #[arg(long)]
        raw: bool,
    },

    /// Format a number for display
    Format {
        /// Number, optionally with thousands separators or exponent
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// n!
    Fact {
        #[arg(allow_negative_numbers = true)]
        n: i64,
    },

    /// Combinations C(n, r)
    Ncr {
        #[arg(allow_negative_numbers = true)]
        n: i64,
        #[arg(allow_negative_numbers = true)]
        r: i64,
    },

    /// Permutations P(n, r)
    Npr {
        #[arg(allow_negative_numbers = true)]
        n: i64,
        #[arg(allow_negative_numbers = true)]
        r: i64,
    },

    /// Greatest common divisor
    Gcd {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },

    /// Least common multiple
    Lcm {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },

    /// Primality test
    Prime {
        #[arg(allow_negative_numbers = true)]
        n: i64,
    },

    /// Convert an integer between bases 2-36
    Base {
        /// Digits in the source base
        #[arg(allow_hyphen_values = true)]
        digits: String,

        #[arg(long, default_value_t = 10)]
        from: u32,

        #[arg(long)]
        to: u32,
    },

    /// Radians to degrees
    Deg {
        #[arg(allow_negative_numbers = true)]
        radians: f64,
    },

    /// Degrees to radians
    Rad {
        #[arg(allow_negative_numbers = true)]
        degrees: f64,
    },

    /// Apply a scientific function (sin, log, sqrt, factorial, pi, ...)
    #[command(name = "fn")]
    Func {
        name: String,

        /// Argument; constants (pi, e) take none
        #[arg(allow_negative_numbers = true)]
        value: Option<f64>,

        /// Override the configured angle mode for trig functions
        #[arg(long)]
        angle: Option<AngleMode>,
    },

    /// Convert a value between units, e.g. `abacus convert 72 °F celsius`
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        from: String,
        to: String,

        /// Fractional digits in the output (defaults to the configured value)
        #[arg(long)]
        decimals: Option<usize>,
    },

    /// Start the interactive session
    Repl,
}

impl Cli {
    /// Load settings and dispatch to the subcommand.
    pub fn run(self) -> Result<()> {
        let settings = self.resolve_settings()?;
        let json = self.json;

        match self.command.unwrap_or(Command::Repl) {
            Command::Eval { expression, raw } => {
                let text = expression.join(" ");
                let value = evaluate(&text)?;
                let display = if raw { value.to_string() } else { format_number(value) };
                emit(json, &text, Some(value), &display);
            }
            Command::Format { value } => {
                let parsed = parse_display(&value)?;
                emit(json, &value, Some(parsed), &format_number(parsed));
            }
            Command::Fact { n } => {
                let value = factorial(n)?;
                emit(json, &format!("{}!", n), Some(value), &format_number(value));
            }
            Command::Ncr { n, r } => {
                let value = combination(n, r)?;
                emit(json, &format!("C({}, {})", n, r), Some(value), &format_number(value));
            }
            Command::Npr { n, r } => {
                let value = permutation(n, r)?;
                emit(json, &format!("P({}, {})", n, r), Some(value), &format_number(value));
            }
            Command::Gcd { a, b } => {
                let value = gcd(a, b)?;
                emit(json, &format!("gcd({}, {})", a, b), Some(value), &format_number(value));
            }
            Command::Lcm { a, b } => {
                let value = lcm(a, b)?;
                emit(json, &format!("lcm({}, {})", a, b), Some(value), &format_number(value));
            }
            Command::Prime { n } => {
                let answer = if is_prime(n) { "prime" } else { "not prime" };
                emit(json, &n.to_string(), None, answer);
            }
            Command::Base { digits, from, to } => {
                let converted = convert_base(&digits, from, to)?;
                emit(json, &format!("{} (base {} -> {})", digits, from, to), None, &converted);
            }
            Command::Deg { radians } => {
                let value = rad_to_deg(radians);
                emit(json, &format!("{} rad", radians), Some(value), &format_number(value));
            }
            Command::Rad { degrees } => {
                let value = deg_to_rad(degrees);
                emit(json, &format!("{}°", degrees), Some(value), &format_number(value));
            }
            Command::Func { name, value, angle } => {
                let function: ScientificFunction = name.parse()?;
                let argument = match value {
                    Some(v) => v,
                    None if function.is_constant() => 0.0,
                    None => anyhow::bail!("{} needs a value, e.g. `abacus fn {} 30`", function, function),
                };
                let mode = angle.unwrap_or(settings.angle_mode);
                let result = function.apply(argument, mode)?;
                let input = if function.is_constant() {
                    function.to_string()
                } else {
                    format!("{}({})", function, argument)
                };
                emit(json, &input, Some(result), &format_number(result));
            }
            Command::Convert { value, from, to, decimals } => {
                let from_unit: Unit = from.parse()?;
                let to_unit: Unit = to.parse()?;
                let converted = convert(value, from_unit, to_unit)?;
                let display = format_fixed(converted, decimals.unwrap_or(settings.conversion_decimals));
                emit(
                    json,
                    &format!("{} {} -> {}", value, from_unit, to_unit),
                    Some(converted),
                    &display,
                );
            }
            Command::Repl => {
                info!(angle_mode = ?settings.angle_mode, "starting interactive session");
                let mut session = Session::new(settings);
                let stdin = io::stdin();
                let interactive = stdin.is_terminal();
                repl::run(&mut session, stdin.lock(), &mut io::stdout().lock(), interactive)?;
            }
        }

        Ok(())
    }

    /// An explicit `--config` must exist; the default location is optional.
    fn resolve_settings(&self) -> Result<Settings> {
        match (&self.config, default_settings_path()) {
            (Some(path), _) => {
                load_settings(path).with_context(|| format!("failed to load settings from {}", path.display()))
            }
            (None, Some(path)) => load_settings_or_default(&path)
                .with_context(|| format!("failed to load settings from {}", path.display())),
            (None, None) => {
                debug!("no config directory on this platform, using default settings");
                Ok(Settings::default())
            }
        }
    }
}

/// Print a result, as display text or as a JSON object.
fn emit(json: bool, input: &str, value: Option<f64>, display: &str) {
    if json {
        let object = json!({
            "input": input,
            "value": value,
            "display": display,
        });
        println!("{}", object);
    } else {
        println!("{}", display);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eval_with_negative_start() {
        let cli = Cli::try_parse_from(["abacus", "eval", "-5", "+", "3"]).unwrap();
        match cli.command {
            Some(Command::Eval { expression, raw }) => {
                assert_eq!(expression.join(" "), "-5 + 3");
                assert!(!raw);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_negative_numbers() {
        let cli = Cli::try_parse_from(["abacus", "fact", "-1"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Fact { n: -1 })));

        let cli = Cli::try_parse_from(["abacus", "convert", "-40", "f", "c", "--decimals", "1"]).unwrap();
        match cli.command {
            Some(Command::Convert { value, from, to, decimals }) => {
                assert_eq!(value, -40.0);
                assert_eq!(from, "f");
                assert_eq!(to, "c");
                assert_eq!(decimals, Some(1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_fn_and_globals() {
        let cli = Cli::try_parse_from(["abacus", "--json", "fn", "sin", "90", "--angle", "radians"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Command::Func { name, value, angle }) => {
                assert_eq!(name, "sin");
                assert_eq!(value, Some(90.0));
                assert_eq!(angle, Some(AngleMode::Radians));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::try_parse_from(["abacus"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_base_defaults_to_decimal_input() {
        let cli = Cli::try_parse_from(["abacus", "base", "255", "--to", "16"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Base { from: 10, to: 16, .. })));
    }
}
