//! Interactive read-eval-print loop.
//!
//! Plain lines are evaluated as expressions. A line starting with a binary
//! operator (`* 2`, `÷ 4`, `+ 1`) continues from the current value.
//! Lines starting with `:` are commands; see [`HELP`].

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use calc_core::{AngleMode, CalcError, CalcResult, ScientificFunction};
use tracing::debug;

use crate::session::{MemoryAction, Session};

pub const HELP: &str = "\
Enter an expression such as (2 + 3) × 4, or continue from the last result
with a line starting with an operator: * 2

Commands:
  :ms :mr :m+ :m- :mc   memory store / recall / add / subtract / clear
  :fn <name>            apply sin cos tan log ln sqrt square inverse
                        factorial percent pi e to the current value
  :mode [deg|rad]       show or set the angle mode
  :history [json]       list calculations, newest first
  :clear                clear history
  :help                 show this text
  :quit                 exit";

const PROMPT: &str = "> ";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
enum Line {
    Empty,
    Evaluate(String),
    Continue(String),
    Memory(MemoryAction),
    Function(ScientificFunction),
    Mode(Option<AngleMode>),
    History { json: bool },
    ClearHistory,
    Help,
    Quit,
}

fn parse_line(line: &str) -> CalcResult<Line> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Empty);
    }

    let Some(command) = line.strip_prefix(':') else {
        let continues = line.starts_with(['+', '*', '/', '×', '÷']);
        return Ok(if continues {
            Line::Continue(line.to_string())
        } else {
            Line::Evaluate(line.to_string())
        });
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();

    let parsed = match (name.as_str(), arg) {
        ("ms" | "mr" | "m+" | "m-" | "mc", None) => Line::Memory(name.parse()?),
        ("fn", Some(func)) => Line::Function(func.parse()?),
        ("mode", None) => Line::Mode(None),
        ("mode", Some(mode)) => Line::Mode(Some(mode.parse()?)),
        ("history", None) => Line::History { json: false },
        ("history", Some("json")) => Line::History { json: true },
        ("clear", None) => Line::ClearHistory,
        ("help" | "h" | "?", None) => Line::Help,
        ("quit" | "q" | "exit", None) => Line::Quit,
        _ => return Err(CalcError::invalid_input("command", line, "unknown command, try :help")),
    };
    Ok(parsed)
}

/// Run the loop until `:quit` or end of input.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W, interactive: bool) -> Result<()> {
    if interactive {
        writeln!(out, "Abacus calculator. Type :help for commands.")?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;

        match parse_line(&line) {
            Ok(Line::Quit) => break,
            Ok(parsed) => handle(session, parsed, out)?,
            Err(e) => writeln!(out, "{}", e)?,
        }
    }

    Ok(())
}

fn handle<W: Write>(session: &mut Session, line: Line, out: &mut W) -> Result<()> {
    match line {
        Line::Empty | Line::Quit => {}
        Line::Evaluate(text) => show_result(out, session.calculate(&text))?,
        Line::Continue(rest) => show_result(out, session.continue_with(&rest))?,
        Line::Function(func) => show_result(out, session.apply_function(func))?,
        Line::Memory(action) => match session.memory(action) {
            Some(display) => writeln!(out, "{}", display)?,
            None => writeln!(out, "{} (memory: {})", action, calc_core::format_number(session.memory_value()))?,
        },
        Line::Mode(None) => writeln!(out, "angle mode: {:?}", session.settings().angle_mode)?,
        Line::Mode(Some(mode)) => {
            session.settings_mut().angle_mode = mode;
            writeln!(out, "angle mode: {:?}", mode)?;
        }
        Line::History { json: true } => writeln!(out, "{}", session.history_json()?)?,
        Line::History { json: false } => {
            if session.history().is_empty() {
                writeln!(out, "(no history)")?;
            }
            for entry in session.history() {
                writeln!(
                    out,
                    "{}  {} = {}",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.expression,
                    entry.result
                )?;
            }
        }
        Line::ClearHistory => {
            session.clear_history();
            writeln!(out, "history cleared")?;
        }
        Line::Help => writeln!(out, "{}", HELP)?,
    }
    Ok(())
}

fn show_result<W: Write>(out: &mut W, result: CalcResult<String>) -> Result<()> {
    match result {
        Ok(display) => writeln!(out, "{}", display)?,
        Err(e) => {
            debug!(error = %e, code = e.error_code(), "calculation failed");
            writeln!(out, "{}", calc_core::format::ERROR_TEXT)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::Settings;
    use std::io::Cursor;

    fn run_script(script: &str) -> String {
        let mut session = Session::new(Settings::default());
        let mut out = Vec::new();
        run(&mut session, Cursor::new(script), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("  ").unwrap(), Line::Empty);
        assert_eq!(parse_line("1 + 2").unwrap(), Line::Evaluate("1 + 2".to_string()));
        assert_eq!(parse_line("-5 + 2").unwrap(), Line::Evaluate("-5 + 2".to_string()));
        assert_eq!(parse_line("× 3").unwrap(), Line::Continue("× 3".to_string()));
        assert_eq!(parse_line(":M+").unwrap(), Line::Memory(MemoryAction::Add));
        assert_eq!(parse_line(":fn √").unwrap(), Line::Function(ScientificFunction::Sqrt));
        assert_eq!(parse_line(":mode rad").unwrap(), Line::Mode(Some(AngleMode::Radians)));
        assert_eq!(parse_line(":history json").unwrap(), Line::History { json: true });
        assert_eq!(parse_line(":q").unwrap(), Line::Quit);
        assert!(parse_line(":fn cosh").is_err());
        assert!(parse_line(":frobnicate").is_err());
    }

    #[test]
    fn test_session_script() {
        let output = run_script("2 × 3\n* 7\n:ms\n1/0\n:mr\n+ 8\n:quit\n99\n");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["6", "42", "MS (memory: 42)", "Error", "42", "50"]);
    }

    #[test]
    fn test_functions_and_history() {
        let output = run_script("4\n:fn factorial\n:fn sqrt\n:history\n");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "4");
        assert_eq!(lines[1], "24");
        assert_eq!(lines[2], "4.89897948557");
        // Function results are not calculations, so only "4" is in history
        assert_eq!(lines.len(), 4);
        assert!(lines[3].ends_with("4 = 4"));
    }

    #[test]
    fn test_unknown_command_keeps_running() {
        let output = run_script(":bogus\n1+1\n");
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("unknown command"));
        assert_eq!(lines[1], "2");
    }
}
