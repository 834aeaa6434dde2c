//! Calculator session state.
//!
//! Everything mutable lives here rather than in `calc_core`: the current
//! value, the memory register and the history list. History is kept only
//! for the lifetime of the process.

use std::fmt;
use std::str::FromStr;

use calc_core::{evaluate, format_number, CalcError, CalcResult, ScientificFunction, Settings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// One successful calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// Expression as entered
    pub expression: String,
    /// Formatted result
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        HistoryEntry {
            id: Uuid::new_v4(),
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Memory register keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryAction {
    /// MS: store the current value
    Store,
    /// MR: recall into the current value
    Recall,
    /// M+: add the current value
    Add,
    /// M-: subtract the current value
    Subtract,
    /// MC: reset to zero
    Clear,
}

impl FromStr for MemoryAction {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" => Ok(MemoryAction::Store),
            "mr" => Ok(MemoryAction::Recall),
            "m+" => Ok(MemoryAction::Add),
            "m-" => Ok(MemoryAction::Subtract),
            "mc" => Ok(MemoryAction::Clear),
            _ => Err(CalcError::invalid_input("memory", s, "expected ms, mr, m+, m- or mc")),
        }
    }
}

impl fmt::Display for MemoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            MemoryAction::Store => "MS",
            MemoryAction::Recall => "MR",
            MemoryAction::Add => "M+",
            MemoryAction::Subtract => "M-",
            MemoryAction::Clear => "MC",
        };
        f.write_str(key)
    }
}

/// Interactive calculator state
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    current: f64,
    memory: f64,
    history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Session {
            settings,
            current: 0.0,
            memory: 0.0,
            history: Vec::new(),
        }
    }

    /// Evaluate `text`, record it in history and make it the current value.
    ///
    /// On failure nothing is recorded and the current value resets to zero,
    /// matching a display that shows "Error".
    pub fn calculate(&mut self, text: &str) -> CalcResult<String> {
        match evaluate(text) {
            Ok(value) => {
                let display = format_number(value);
                self.current = value;
                self.record(text, &display);
                Ok(display)
            }
            Err(e) => {
                self.current = 0.0;
                Err(e)
            }
        }
    }

    /// Evaluate `rest` as a continuation of the current value, e.g. `* 2`
    /// after a result of 21.
    pub fn continue_with(&mut self, rest: &str) -> CalcResult<String> {
        // f64 Display never uses exponent notation, so the evaluator accepts it
        let text = format!("({}) {}", self.current, rest);
        self.calculate(&text)
    }

    /// Apply a scientific function to the current value.
    pub fn apply_function(&mut self, function: ScientificFunction) -> CalcResult<String> {
        match function.apply(self.current, self.settings.angle_mode) {
            Ok(value) => {
                debug!(%function, input = self.current, value, "applied function");
                self.current = value;
                Ok(format_number(value))
            }
            Err(e) => {
                self.current = 0.0;
                Err(e)
            }
        }
    }

    /// Operate the memory register. Returns the new display text when the
    /// current value changes (MR), otherwise `None`.
    pub fn memory(&mut self, action: MemoryAction) -> Option<String> {
        match action {
            MemoryAction::Store => self.memory = self.current,
            MemoryAction::Recall => {
                self.current = self.memory;
                return Some(format_number(self.memory));
            }
            MemoryAction::Add => self.memory += self.current,
            MemoryAction::Subtract => self.memory -= self.current,
            MemoryAction::Clear => self.memory = 0.0,
        }
        debug!(%action, memory = self.memory, "memory updated");
        None
    }

    fn record(&mut self, expression: &str, result: &str) {
        self.history.insert(0, HistoryEntry::new(expression, result));
        self.history.truncate(self.settings.history_limit);
    }

    /// History, newest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// History as pretty-printed JSON
    pub fn history_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(&self.history).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })
    }

    #[cfg(test)]
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn memory_value(&self) -> f64 {
        self.memory
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::AngleMode;

    fn session() -> Session {
        Session::new(Settings::default())
    }

    #[test]
    fn test_calculate_records_history() {
        let mut s = session();
        assert_eq!(s.calculate("2 × 3").unwrap(), "6");
        assert_eq!(s.calculate("1000 * 1000").unwrap(), "1,000,000");

        let history = s.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].expression, "1000 * 1000");
        assert_eq!(history[0].result, "1,000,000");
        assert_eq!(history[1].expression, "2 × 3");
        assert_ne!(history[0].id, history[1].id);
    }

    #[test]
    fn test_errors_are_not_recorded() {
        let mut s = session();
        s.calculate("5").unwrap();
        assert!(s.calculate("1/0").is_err());
        assert!(s.calculate("(2+3").is_err());
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.current(), 0.0);
    }

    #[test]
    fn test_history_limit() {
        let mut s = Session::new(Settings {
            history_limit: 3,
            ..Settings::default()
        });
        for i in 0..10 {
            s.calculate(&format!("{} + 1", i)).unwrap();
        }
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.history()[0].result, "10");
        assert_eq!(s.history()[2].result, "8");

        s.clear_history();
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_continue_with() {
        let mut s = session();
        s.calculate("-21").unwrap();
        assert_eq!(s.continue_with("* 2").unwrap(), "-42");
        assert_eq!(s.continue_with("÷ 4").unwrap(), "-10.5");
    }

    #[test]
    fn test_memory_register() {
        let mut s = session();
        s.calculate("10").unwrap();
        assert_eq!(s.memory(MemoryAction::Store), None);
        s.calculate("5").unwrap();
        s.memory(MemoryAction::Add);
        assert_eq!(s.memory_value(), 15.0);
        s.calculate("20").unwrap();
        s.memory(MemoryAction::Subtract);
        assert_eq!(s.memory_value(), -5.0);

        assert_eq!(s.memory(MemoryAction::Recall), Some("-5".to_string()));
        assert_eq!(s.current(), -5.0);

        s.memory(MemoryAction::Clear);
        assert_eq!(s.memory_value(), 0.0);
    }

    #[test]
    fn test_apply_function() {
        let mut s = session();
        s.calculate("5").unwrap();
        assert_eq!(s.apply_function(ScientificFunction::Factorial).unwrap(), "120");
        assert_eq!(s.apply_function(ScientificFunction::Sqrt).unwrap(), "10.9544511501");

        s.settings_mut().angle_mode = AngleMode::Radians;
        s.calculate("0").unwrap();
        assert_eq!(s.apply_function(ScientificFunction::Cos).unwrap(), "1");

        s.calculate("-1").unwrap();
        assert!(s.apply_function(ScientificFunction::Sqrt).is_err());
        assert_eq!(s.current(), 0.0);
    }

    #[test]
    fn test_memory_action_parse() {
        assert_eq!("M+".parse::<MemoryAction>().unwrap(), MemoryAction::Add);
        assert_eq!("mc".parse::<MemoryAction>().unwrap(), MemoryAction::Clear);
        assert!("m*".parse::<MemoryAction>().is_err());
        assert_eq!(MemoryAction::Subtract.to_string(), "M-");
    }

    #[test]
    fn test_history_json() {
        let mut s = session();
        s.calculate("1 + 1").unwrap();
        let json = s.history_json().unwrap();
        let parsed: Vec<HistoryEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, s.history());
    }
}
