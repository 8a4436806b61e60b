//! Session commands: login, logout, status, register, profile.

use std::io::Write;

use backoffice_client::LoginOutcome;
use backoffice_core::{Credentials, Registration};
use serde_json::{json, Map, Value};

use super::print_json;
use crate::error::CommandError;
use crate::state::AppState;

pub(super) async fn login(
    state: &AppState,
    email: String,
    password: String,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match state.auth.login(&Credentials::new(email, password)).await {
        LoginOutcome::Success { user } => {
            writeln!(out, "Signed in as {}.", user.display_name())?;
            Ok(())
        }
        LoginOutcome::Failure { error } => Err(CommandError::unauthorized(error)),
    }
}

pub(super) fn logout(state: &AppState, out: &mut dyn Write) -> Result<(), CommandError> {
    state.auth.logout();
    writeln!(out, "Signed out.")?;
    Ok(())
}

pub(super) fn status(state: &AppState, out: &mut dyn Write) -> Result<(), CommandError> {
    let auth = state.auth.state();
    let report = json!({
        "authenticated": auth.is_authenticated(),
        "user": auth.user,
        "production": state.config.production,
        "services": state.config.services,
    });
    print_json(out, &report)
}

pub(super) async fn register(
    state: &AppState,
    name: String,
    email: String,
    password: String,
    data: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let extra = match data {
        Some(raw) => parse_object(raw)?,
        None => Map::new(),
    };
    let registration = Registration {
        name,
        email,
        password,
        extra,
    };

    let payload = state.backend.auth().register(&registration).await?;
    print_json(out, &payload)
}

pub(super) async fn profile(state: &AppState, out: &mut dyn Write) -> Result<(), CommandError> {
    let payload = state.backend.auth().get_profile().await?;
    print_json(out, &payload)
}

fn parse_object(raw: &str) -> Result<Map<String, Value>, CommandError> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CommandError::invalid_input("--data must be a JSON object")),
    }
}
