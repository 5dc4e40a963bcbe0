//! # Format Subcommand
//!
//! Applies the input mask of a field. Partial input gets a partial mask, the
//! same as while typing.

use anyhow::Result;
use clap::{Args, ValueEnum};

use cadastro_core::{format_national_id, format_phone, format_postal_code};

/// Kind of value to format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatKind {
    /// `000.000.000-00`
    Cpf,
    /// `00000-000`
    Cep,
    /// `(00) 0000-0000` or `(00) 00000-0000`
    Phone,
}

/// Arguments for the `cadastro format` subcommand.
#[derive(Args, Debug)]
pub struct FormatArgs {
    #[arg(value_enum)]
    pub kind: FormatKind,

    /// The value as typed.
    pub value: String,
}

pub fn format_value(kind: FormatKind, value: &str) -> String {
    match kind {
        FormatKind::Cpf => format_national_id(value),
        FormatKind::Cep => format_postal_code(value),
        FormatKind::Phone => format_phone(value),
    }
}

/// Execute the format subcommand. Always exits 0.
pub fn run_format(args: &FormatArgs) -> Result<u8> {
    println!("{}", format_value(args.kind, &args.value));
    Ok(0)
}
