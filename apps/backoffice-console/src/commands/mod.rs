//! # Command Dispatch
//!
//! Routes each parsed [`Command`] to its handler. Handlers write payloads
//! to `out` as pretty JSON and report failures as [`CommandError`].
//!
//! ## Command Categories
//!
//! ### Session
//! - `login`, `logout`, `status`, `register`, `profile`
//!
//! ### Services
//! - `health [service] [--db]`
//!
//! ### Resources
//! - `users|products|sales|refunds list|get|create|update|delete`
//! - `products with-users`, `sales with-external`
//!
//! ### Shell
//! - `open <path>`

mod auth;
mod resources;

use std::io::Write;

use serde::Serialize;

use crate::cli::{Command, ProductsCommand, SalesCommand};
use crate::error::CommandError;
use crate::shell;
use crate::state::AppState;

/// Runs one command against `state`.
pub async fn dispatch(
    state: &AppState,
    command: Command,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match command {
        Command::Login { email, password } => auth::login(state, email, password, out).await,
        Command::Logout => auth::logout(state, out),
        Command::Status => auth::status(state, out),
        Command::Register {
            name,
            email,
            password,
            data,
        } => auth::register(state, name, email, password, data.as_deref(), out).await,
        Command::Profile => auth::profile(state, out).await,
        Command::Health { service, db } => resources::health(state, service, db, out).await,
        Command::Open { path } => shell::open(state, &path, out),

        Command::Users(cmd) => resources::run_crud(state.backend.users(), cmd, out).await,
        Command::Refunds(cmd) => resources::run_crud(state.backend.refunds(), cmd, out).await,
        Command::Products(ProductsCommand::Crud(cmd)) => {
            resources::run_crud(state.backend.products(), cmd, out).await
        }
        Command::Products(ProductsCommand::WithUsers) => {
            let payload = state.backend.products().list_with_users().await?;
            print_json(out, &payload)
        }
        Command::Sales(SalesCommand::Crud(cmd)) => {
            resources::run_crud(state.backend.sales(), cmd, out).await
        }
        Command::Sales(SalesCommand::WithExternal) => {
            let payload = state.backend.sales().list_with_external().await?;
            print_json(out, &payload)
        }
    }
}

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<(), CommandError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::internal(format!("failed to render output: {}", e)))?;
    writeln!(out, "{}", text)?;
    Ok(())
}
