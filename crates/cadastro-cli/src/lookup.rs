//! # Lookup Subcommand
//!
//! Resolves a CEP to its address through the postal lookup service and
//! prints the address as JSON. Needs no database credentials.

use anyhow::{Context, Result};
use clap::Args;

use cadastro_client::{PostalClient, PostalConfig};
use cadastro_core::PostalCode;

use crate::EXIT_REJECTED;

/// Arguments for the `cadastro lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// CEP, with or without the dash.
    #[arg(value_name = "CEP")]
    pub postal_code: String,
}

/// Execute the lookup subcommand.
///
/// Returns exit code: 0 when found, 1 when the CEP is malformed or unknown,
/// 2 on operational error.
pub fn run_lookup(args: &LookupArgs) -> Result<u8> {
    let Ok(postal_code) = PostalCode::new(args.postal_code.as_str()) else {
        println!("invalid CEP: {}", args.postal_code);
        return Ok(EXIT_REJECTED);
    };

    let config = PostalConfig::from_env().context("failed to load postal configuration")?;
    let client = PostalClient::new(&config)?;

    let found = crate::block_on(client.lookup(&postal_code))?
        .with_context(|| format!("lookup of CEP {postal_code} failed"))?;

    match found {
        Some(address) => {
            let json = serde_json::to_string_pretty(&address)?;
            println!("{json}");
            Ok(0)
        }
        None => {
            println!("CEP not found: {}", postal_code.formatted());
            Ok(EXIT_REJECTED)
        }
    }
}
