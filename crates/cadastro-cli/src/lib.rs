//! # cadastro-cli -- Command-line front end of the registration engine
//!
//! ## Subcommands
//!
//! - `cadastro check <cpf|cep|phone|name> VALUE`: validity of one value.
//! - `cadastro format <cpf|cep|phone> VALUE`: apply the input mask.
//! - `cadastro lookup CEP`: address for a postal code, as JSON.
//! - `cadastro register FILE [--dry-run]`: validate a JSON or YAML form and
//!   store it.
//!
//! ```bash
//! cadastro check cpf 111.444.777-35
//! cadastro format phone 11987654321
//! CADASTRO_DATABASE_URL=https://xyz.supabase.co CADASTRO_DATABASE_KEY=... \
//!     cadastro register form.yaml
//! ```
//!
//! Handlers return the process exit code; operational failures propagate as
//! `anyhow::Error` and exit with 2.

pub mod check;
pub mod format;
pub mod lookup;
pub mod register;

use std::future::Future;

use anyhow::{Context, Result};

/// Exit code for a rejected input.
pub const EXIT_REJECTED: u8 = 1;

/// Run `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
