//! # Backoffice Console
//!
//! Terminal shell over the users, products, sales and refunds services.
//!
//! ## Module Organization
//! ```text
//! backoffice_console/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap command tree
//! ├── state.rs        ◄─── AppState: config, session, backend, auth
//! ├── shell.rs        ◄─── Route resolution and the login page
//! ├── commands/
//! │   ├── mod.rs      ◄─── dispatch
//! │   ├── auth.rs     ◄─── login/logout/status/register/profile
//! │   └── resources.rs◄─── CRUD and health
//! └── error.rs        ◄─── CommandError and exit codes
//! ```
//!
//! ## Output Channels
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdout ◄── payloads (pretty JSON), login page                          │
//! │  stderr ◄── tracing logs, error[CODE]: message (or JSON)                │
//! │  exit   ◄── ErrorCode::exit_status, 0 on success                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! When any service rejects the session during a command, the session is
//! cleared and the shell lands on the login page, exiting with status 3.

pub mod cli;
pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

use backoffice_client::ClientConfig;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::{CommandError, ErrorCode};
use state::AppState;

/// Parses arguments, runs one command and returns the process status.
///
/// ## Startup Sequence
/// 1. Parse the command line
/// 2. Load configuration (file, then environment)
/// 3. Initialize logging
/// 4. Build [`AppState`] and restore the persisted session
/// 5. Dispatch the command
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => return fail(&CommandError::from(e), cli.json_errors),
    };

    init_tracing(config.production);
    debug!(production = config.production, "Configuration loaded");

    let state = match AppState::build(config) {
        Ok(state) => state,
        Err(e) => return fail(&CommandError::from(e), cli.json_errors),
    };

    let mut stdout = std::io::stdout();
    let result = commands::dispatch(&state, cli.command, &mut stdout).await;

    if state.session_expired() {
        warn!("Session rejected by a service, returning to login");
        if let Err(e) = shell::render_login_page(&mut stdout, &state.auth) {
            return fail(&CommandError::from(e), cli.json_errors);
        }
        let err = match result {
            Err(err) => err,
            Ok(()) => CommandError::unauthorized("session expired"),
        };
        report(&err, cli.json_errors);
        return ErrorCode::Unauthorized.exit_status().into();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err, cli.json_errors),
    }
}

fn fail(err: &CommandError, json: bool) -> ExitCode {
    report(err, json);
    err.exit_code()
}

fn report(err: &CommandError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(line) => eprintln!("{}", line),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("{}", err);
    }
}

/// Installs the stderr subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=backoffice_client=trace` - Trace HTTP calls only
/// - Default: `info` with debug for the backoffice crates, `warn` in production
fn init_tracing(production: bool) {
    let default = if production {
        "warn"
    } else {
        "info,backoffice_client=debug,backoffice_console=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
