//! # Auth Context
//!
//! Application-wide authentication state.
//!
//! ## State Machine
//! ```text
//!                 initialize()
//!  ┌──────────────┐  token + user   ┌──────────────────────┐
//!  │ Initializing │────────────────►│ Authenticated(user)  │
//!  └──────┬───────┘                 └──────────┬───────────┘
//!         │ otherwise                 ▲        │ Ended / Expired
//!         ▼                           │        ▼
//!  ┌──────────────┐   Started{user}   │  ┌──────────────┐
//!  │  Anonymous   │───────────────────┘  │  Anonymous   │
//!  └──────────────┘                      └──────────────┘
//! ```
//!
//! After initialization every transition comes from a [`SessionEvent`].
//! `login` and `logout` mutate the [`SessionStore`] and then apply the
//! events that mutation published, so a 401 seen by any service client moves
//! the context to `Anonymous` the same way a logout does.
//!
//! The context is an explicit value handed to whoever needs it; there is no
//! global instance.

use std::sync::{Mutex, RwLock};

use backoffice_core::{Credentials, User};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::resources::AuthApi;
use crate::session::{SessionEvent, SessionStore};

/// Failure message when the server gives no `error` string.
pub const DEFAULT_LOGIN_ERROR: &str = "Error en el login";

/// Where the context stands.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPhase {
    Initializing,
    Anonymous,
    Authenticated(User),
}

/// What the UI reads.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl From<&AuthPhase> for AuthState {
    fn from(phase: &AuthPhase) -> Self {
        match phase {
            AuthPhase::Initializing => AuthState {
                user: None,
                loading: true,
            },
            AuthPhase::Anonymous => AuthState {
                user: None,
                loading: false,
            },
            AuthPhase::Authenticated(user) => AuthState {
                user: Some(user.clone()),
                loading: false,
            },
        }
    }
}

/// Result of [`AuthContext::login`]. Login never returns an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success { user: User },
    Failure { error: String },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }
}

// =============================================================================
// Auth Context
// =============================================================================

/// Authentication state derived from the session store.
pub struct AuthContext {
    session: SessionStore,
    auth: AuthApi,
    phase: RwLock<AuthPhase>,
    events: Mutex<broadcast::Receiver<SessionEvent>>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("phase", &*self.read_phase())
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Creates a context in `Initializing`. Subscribes to session events
    /// immediately so nothing published afterwards is missed.
    pub fn new(session: SessionStore, auth: AuthApi) -> Self {
        let events = session.subscribe();
        AuthContext {
            session,
            auth,
            phase: RwLock::new(AuthPhase::Initializing),
            events: Mutex::new(events),
        }
    }

    /// Reads the session store once. Later calls do nothing.
    pub fn initialize(&self) {
        if *self.read_phase() != AuthPhase::Initializing {
            return;
        }

        // the store read below already reflects anything queued so far
        if let Ok(mut events) = self.events.lock() {
            while !matches!(events.try_recv(), Err(TryRecvError::Empty | TryRecvError::Closed)) {}
        }

        let phase = self.derive_from_store();
        match &phase {
            AuthPhase::Authenticated(user) => {
                info!(user = %user.display_name(), "Restored persisted session")
            }
            _ => info!("No persisted session"),
        }
        *self.write_phase() = phase;
    }

    /// Current phase, after applying pending session events.
    pub fn phase(&self) -> AuthPhase {
        self.apply_events();
        self.read_phase().clone()
    }

    pub fn state(&self) -> AuthState {
        AuthState::from(&self.phase())
    }

    pub fn user(&self) -> Option<User> {
        self.state().user
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Authenticates and persists the session.
    ///
    /// On failure the state and the persisted session are left as they
    /// were, and the outcome carries the server's `error` message or
    /// [`DEFAULT_LOGIN_ERROR`].
    pub async fn login(&self, credentials: &Credentials) -> LoginOutcome {
        let response = match self.auth.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login rejected");
                let error = e
                    .server_message()
                    .unwrap_or(DEFAULT_LOGIN_ERROR)
                    .to_string();
                self.apply_events();
                return LoginOutcome::Failure { error };
            }
        };

        if let Err(e) = self.session.write(&response.token, &response.user) {
            warn!(error = %e, "Failed to persist session");
            return LoginOutcome::Failure {
                error: DEFAULT_LOGIN_ERROR.to_string(),
            };
        }

        self.apply_events();
        info!(user = %response.user.display_name(), "Logged in");
        LoginOutcome::Success {
            user: response.user,
        }
    }

    /// Clears the session and returns to `Anonymous`.
    pub fn logout(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session on logout");
        }
        *self.write_phase() = AuthPhase::Anonymous;
        self.apply_events();
        info!("Logged out");
    }

    fn apply_events(&self) {
        if *self.read_phase() == AuthPhase::Initializing {
            return;
        }

        let Ok(mut events) = self.events.lock() else {
            return;
        };

        loop {
            let next = match events.try_recv() {
                Ok(SessionEvent::Started { user }) => AuthPhase::Authenticated(user),
                Ok(SessionEvent::Ended) => AuthPhase::Anonymous,
                Ok(SessionEvent::Expired { service }) => {
                    debug!(%service, "Session expired by service");
                    AuthPhase::Anonymous
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed session events, re-reading store");
                    self.derive_from_store()
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            };
            *self.write_phase() = next;
        }
    }

    fn derive_from_store(&self) -> AuthPhase {
        match self.session.read().authenticated_user() {
            Some(user) => AuthPhase::Authenticated(user.clone()),
            None => AuthPhase::Anonymous,
        }
    }

    fn read_phase(&self) -> std::sync::RwLockReadGuard<'_, AuthPhase> {
        self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_phase(&self) -> std::sync::RwLockWriteGuard<'_, AuthPhase> {
        self.phase.write().unwrap_or_else(|e| e.into_inner())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
