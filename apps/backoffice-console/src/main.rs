//! # Backoffice Console Entry Point
//!
//! Setup lives in the library so it can be tested; see
//! [`backoffice_console::run`].

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    backoffice_console::run().await
}
