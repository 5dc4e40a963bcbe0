//! # cadastro CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//!
//! Exit codes: 0 on success, 1 when the input is rejected (invalid value,
//! unknown CEP, duplicate CPF), 2 on operational errors (configuration,
//! network, unreadable file).

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cadastro_cli::check::{run_check, CheckArgs};
use cadastro_cli::format::{run_format, FormatArgs};
use cadastro_cli::lookup::{run_lookup, LookupArgs};
use cadastro_cli::register::{run_register, RegisterArgs};

/// Registration toolkit for Brazilian personal data.
///
/// Checks and formats CPF, CEP, and phone values, looks up addresses by CEP,
/// and registers completed forms.
#[derive(Parser, Debug)]
#[command(name = "cadastro", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a value is valid.
    Check(CheckArgs),

    /// Apply the input mask to a value.
    Format(FormatArgs),

    /// Look up the address of a CEP.
    Lookup(LookupArgs),

    /// Validate a form file and store it.
    Register(RegisterArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "cadastro CLI starting");

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Format(args) => run_format(&args),
        Commands::Lookup(args) => run_lookup(&args),
        Commands::Register(args) => run_register(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
