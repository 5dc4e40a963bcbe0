//! # Register Subcommand
//!
//! Reads a completed form from a JSON or YAML file, validates every step,
//! and stores the registration.
//!
//! ```yaml
//! full_name: Maria da Silva
//! national_id: 111.444.777-35
//! phone: (11) 98765-4321
//! postal_code: 01310-930
//! address:
//!   street: Avenida Paulista
//!   number: "1578"
//!   neighborhood: Bela Vista
//!   city: São Paulo
//!   state: SP
//! marital_status: CASADO
//! has_children: true
//! children_count: 2
//! sex: FEMININO
//! ```
//!
//! With `--dry-run` the record that would be inserted is printed and nothing
//! is sent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use uuid::Uuid;

use cadastro_client::{CadastroClient, ClientConfig, SaveError, SubmitError};
use cadastro_core::{FieldErrors, RegistrationForm};

use crate::EXIT_REJECTED;

/// Arguments for the `cadastro register` subcommand.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Form file (`.json`, `.yaml`, or `.yml`).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Validate and print the record without storing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Account the registration belongs to. A random id is used when absent.
    #[arg(long)]
    pub user_id: Option<Uuid>,
}

/// Load a form, choosing the parser from the file extension.
///
/// Files without a YAML extension are read as JSON.
pub fn load_form(path: &Path) -> Result<RegistrationForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML form {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON form {}", path.display()))
    }
}

fn print_field_errors(errors: &FieldErrors) {
    println!("{} field(s) need attention:", errors.len());
    for (field, error) in errors.iter() {
        println!("  {field}: {error}");
    }
}

/// Execute the register subcommand.
///
/// Returns exit code: 0 when stored (or valid, with `--dry-run`), 1 when the
/// form is invalid or the database refuses it, 2 on operational error.
pub fn run_register(args: &RegisterArgs) -> Result<u8> {
    let form = load_form(&args.file)?;
    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    let registered_at = Utc::now();

    if args.dry_run {
        let validated = match form.validate() {
            Ok(validated) => validated,
            Err(errors) => {
                print_field_errors(&errors);
                return Ok(EXIT_REJECTED);
            }
        };
        let record = validated.into_record(user_id, registered_at);
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(0);
    }

    // Reject an invalid form before demanding credentials.
    let errors = form.validate_all();
    if !errors.is_empty() {
        print_field_errors(&errors);
        return Ok(EXIT_REJECTED);
    }

    let config = ClientConfig::from_env().context("failed to load client configuration")?;
    let service = CadastroClient::new(config)?.service();

    match crate::block_on(service.submit(&form, user_id, registered_at))? {
        Ok(record) => {
            tracing::info!(user_id = %record.user_id, row_id = ?record.row_id, "registration stored");
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(0)
        }
        Err(SubmitError::Invalid(errors)) => {
            print_field_errors(&errors);
            Ok(EXIT_REJECTED)
        }
        Err(SubmitError::Save(SaveError::Client(e))) => {
            Err(e).context("registration could not be stored")
        }
        Err(SubmitError::Save(refused)) => {
            println!("{refused}");
            Ok(EXIT_REJECTED)
        }
    }
}
