//! # Request/Response Interceptors
//!
//! The two hooks every service client shares.
//!
//! ```text
//!   request ──► BearerAuth ──► network ──► response
//!                  │                          │
//!          token? add header            UnauthorizedGuard
//!                                          │ 401?
//!                                          ├─► SessionStore::expire(service)
//!                                          └─► Navigator::navigate(/login)
//! ```
//!
//! Neither hook can fail a request: a missing token just means no header,
//! and the guard only observes the error the caller will receive.

use std::sync::Arc;

use backoffice_core::ServiceKind;
use reqwest::RequestBuilder;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::navigation::{Navigator, Route};
use crate::session::SessionStore;

/// Adds `Authorization: Bearer <token>` when a session token is stored.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    session: SessionStore,
}

impl BearerAuth {
    pub fn new(session: SessionStore) -> Self {
        BearerAuth { session }
    }

    /// Reads the token at dispatch time, so logins and logouts apply to
    /// the very next request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => {
                debug!("No session token, sending anonymous request");
                request
            }
        }
    }
}

/// Tears the session down when a service answers 401.
#[derive(Clone)]
pub struct UnauthorizedGuard {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for UnauthorizedGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedGuard")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl UnauthorizedGuard {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        UnauthorizedGuard { session, navigator }
    }

    /// Reacts to a failed call. Only 401 has side effects.
    pub fn inspect(&self, service: ServiceKind, error: &ClientError) {
        if !error.is_unauthorized() {
            return;
        }

        warn!(%service, "Service rejected credentials, redirecting to login");
        self.session.expire(service);
        self.navigator.navigate(Route::Login);
    }
}
