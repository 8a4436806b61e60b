//! # Routing Shell
//!
//! The console rendition of the web shell: `/` and `/login` show the login
//! entry point, everything else is "not found".
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Backoffice                                   │
//! │                                              │
//! │ Sign in:                                     │
//! │   backoffice login --email <email>           │
//! │                    --password <password>     │
//! └──────────────────────────────────────────────┘
//! ```

use std::io::Write;

use backoffice_client::{AuthContext, Route};

use crate::error::CommandError;
use crate::state::AppState;

/// Writes the login entry point.
pub fn render_login_page(out: &mut dyn Write, auth: &AuthContext) -> std::io::Result<()> {
    writeln!(out, "Backoffice")?;
    writeln!(out, "==========")?;
    writeln!(out)?;
    match auth.user() {
        Some(user) => {
            writeln!(out, "Signed in as {}.", user.display_name())?;
            writeln!(out, "Sign out with: backoffice logout")?;
        }
        None => {
            writeln!(out, "Sign in:")?;
            writeln!(out, "  backoffice login --email <email> --password <password>")?;
        }
    }
    Ok(())
}

/// Resolves `path` and renders what the shell would show for it.
pub fn open(state: &AppState, path: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    let route = Route::from_path(path);
    state.routes.open(route.clone());

    if route.shows_login() {
        render_login_page(out, &state.auth)?;
        Ok(())
    } else {
        Err(CommandError::not_found(format!("no page at {}", route)))
    }
}
