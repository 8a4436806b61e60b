//! # Auth API
//!
//! Authentication endpoints hosted by the users service.
//!
//! ```text
//!   login(credentials) ──► POST /auth/login     ──► { token, user }
//!   register(data)     ──► POST /auth/register  ──► server payload
//!   get_profile()      ──► GET  /auth/me        ──► server payload
//! ```
//!
//! Shares the users client, so the bearer header and the 401 handling
//! apply here too.

use backoffice_core::{Credentials, LoginResponse, Registration};
use serde_json::Value;
use tracing::debug;

use crate::api_client::ApiClient;
use crate::error::ClientResult;

/// Client for `/auth/*`.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        AuthApi { client }
    }

    /// Exchanges credentials for a token and the user record.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        debug!(email = %credentials.email, "Logging in");
        self.client.post(&["auth", "login"], credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<Value> {
        debug!(email = %registration.email, "Registering user");
        self.client.post(&["auth", "register"], registration).await
    }

    /// Profile of the user owning the current token.
    pub async fn get_profile(&self) -> ClientResult<Value> {
        self.client.get(&["auth", "me"]).await
    }
}
