//! Butter CLI - design Butterworth filters and filter CSV sample matrices

use std::process::ExitCode;

use butter_dsp::{ErrorKind, FilterError};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod matrix;

use cli::{Cli, Command};

/// Exit code for rejected filter parameters or coefficients
const EXIT_INVALID_ARGUMENT: u8 = 2;
/// Exit code for an internal design failure
const EXIT_CALCULATION_FAILED: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Design(args) => commands::design::execute(args),
        Command::Generate(args) => commands::generate::execute(args),
        Command::Filter(args) => commands::filter::execute(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            exit_code(&err)
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "butter_cli=info,butter_dsp=info",
        2 => "butter_cli=debug,butter_dsp=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries data, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let filter_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<FilterError>());
    match filter_error.map(FilterError::kind) {
        Some(ErrorKind::InvalidArgument) => ExitCode::from(EXIT_INVALID_ARGUMENT),
        Some(ErrorKind::CalculationFailed) => ExitCode::from(EXIT_CALCULATION_FAILED),
        None => ExitCode::FAILURE,
    }
}
