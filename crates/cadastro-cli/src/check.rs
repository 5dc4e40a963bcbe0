//! # Check Subcommand
//!
//! Reports whether a single value passes its validator, with the normalized
//! value that would be stored. With `--registry`, a valid CPF is also checked
//! against the registration table.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use cadastro_client::{CadastroClient, ClientConfig, NationalIdCheck};
use cadastro_core::{
    is_valid_name, is_valid_national_id, is_valid_phone, is_valid_postal_code, normalize_digits,
};

use crate::EXIT_REJECTED;

/// Kind of value to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckKind {
    /// CPF (11 digits with check digits).
    Cpf,
    /// CEP (8 digits).
    Cep,
    /// Phone with area code (10 or 11 digits).
    Phone,
    /// Full name (at least 2 characters).
    Name,
}

/// Arguments for the `cadastro check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// What the value is.
    #[arg(value_enum)]
    pub kind: CheckKind,

    /// The value as typed; punctuation is ignored.
    pub value: String,

    /// Also ask the registration table whether a valid CPF is taken.
    #[arg(long)]
    pub registry: bool,
}

/// Result of checking one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub valid: bool,
    /// Digits for identifiers, the trimmed text for names.
    pub normalized: String,
}

/// Check `value` as `kind`.
pub fn check_value(kind: CheckKind, value: &str) -> CheckOutcome {
    match kind {
        CheckKind::Cpf => CheckOutcome {
            valid: is_valid_national_id(value),
            normalized: normalize_digits(value),
        },
        CheckKind::Cep => CheckOutcome {
            valid: is_valid_postal_code(value),
            normalized: normalize_digits(value),
        },
        CheckKind::Phone => CheckOutcome {
            valid: is_valid_phone(value),
            normalized: normalize_digits(value),
        },
        CheckKind::Name => CheckOutcome {
            valid: is_valid_name(value),
            normalized: value.trim().to_string(),
        },
    }
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when valid (and free, with `--registry`), 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let outcome = check_value(args.kind, &args.value);
    tracing::info!(kind = ?args.kind, valid = outcome.valid, "checked value");

    if !outcome.valid {
        println!("invalid: {}", outcome.normalized);
        return Ok(EXIT_REJECTED);
    }

    if args.registry && args.kind == CheckKind::Cpf {
        return check_registry(&args.value);
    }

    println!("valid: {}", outcome.normalized);
    Ok(0)
}

fn check_registry(raw: &str) -> Result<u8> {
    let config = ClientConfig::from_env().context("failed to load client configuration")?;
    let service = CadastroClient::new(config)?.service();

    let check = crate::block_on(service.check_national_id(raw))?
        .context("uniqueness check failed")?;

    match check {
        NationalIdCheck::Available(cpf) => {
            println!("valid: {} (not registered)", cpf.as_str());
            Ok(0)
        }
        NationalIdCheck::AlreadyRegistered(cpf) => {
            println!("registered: {}", cpf.as_str());
            Ok(EXIT_REJECTED)
        }
        NationalIdCheck::Invalid => {
            println!("invalid: {}", normalize_digits(raw));
            Ok(EXIT_REJECTED)
        }
    }
}
