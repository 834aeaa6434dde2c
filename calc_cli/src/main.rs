//! # Abacus CLI Application
//!
//! Terminal host for `calc_core`: one-shot subcommands for every engine
//! operation, and an interactive session that owns the memory register
//! and calculation history.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

mod cli;
mod repl;
mod session;

use std::process::ExitCode;

use calc_core::CalcError;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, json);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("calc_core=warn,calc_cli=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(error: &anyhow::Error, json: bool) {
    if json {
        if let Some(calc_error) = error.downcast_ref::<CalcError>() {
            if let Ok(text) = serde_json::to_string(calc_error) {
                eprintln!("{}", text);
                return;
            }
        }
    }

    eprintln!("Error: {:#}", error);
}
