//! # Session Store
//!
//! The persisted token/user pair and the bus announcing its changes.
//!
//! ## Persisted Layout
//! ```text
//! ┌────────────┬──────────────────────────────────────────┐
//! │ key        │ value                                    │
//! ├────────────┼──────────────────────────────────────────┤
//! │ token      │ opaque bearer credential                 │
//! │ user       │ JSON text of the user record             │
//! └────────────┴──────────────────────────────────────────┘
//! ```
//! Both absent means logged out. The two entries are written one after the
//! other; nothing makes the pair atomic.
//!
//! ## Session Events
//! ```text
//!   write(token, user) ──► Started { user }
//!   clear()            ──► Ended
//!   expire(service)    ──► Expired { service }     (after a 401)
//!   read() healing a corrupt user entry ──► (nothing)
//! ```
//! Subscribers (the auth context) receive events through a
//! `tokio::sync::broadcast` channel and may lag; lagging subscribers must
//! re-read the store.

use std::sync::Arc;

use backoffice_core::{ServiceKind, User};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::ClientResult;
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the serialized user record.
pub const USER_KEY: &str = "user";

/// Buffered session events per subscriber.
const EVENT_CAPACITY: usize = 16;

// =============================================================================
// Session
// =============================================================================

/// Snapshot of the persisted session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// Returns the user when both a token and a user are present.
    pub fn authenticated_user(&self) -> Option<&User> {
        match (&self.token, &self.user) {
            (Some(_), Some(user)) => Some(user),
            _ => None,
        }
    }
}

/// A change to the persisted session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A login persisted a new session.
    Started { user: User },
    /// The session was cleared by logout.
    Ended,
    /// A service rejected the token and the session was cleared.
    Expired { service: ServiceKind },
}

// =============================================================================
// Session Store
// =============================================================================

/// Reads and mutates the persisted session. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        SessionStore { storage, events }
    }

    /// Subscribes to session events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Reads the persisted session.
    ///
    /// Never fails: a storage error yields an empty session, and a user
    /// entry that does not parse removes both entries before returning an
    /// empty session.
    pub fn read(&self) -> Session {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                return Session::default();
            }
        };

        let raw_user = match self.storage.get(USER_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to read session user");
                return Session::default();
            }
        };

        let user = match raw_user {
            None => None,
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Persisted user is corrupt, clearing session");
                    if let Err(e) = self.remove_entries() {
                        warn!(error = %e, "Failed to clear corrupt session");
                    }
                    return Session::default();
                }
            },
        };

        Session { token, user }
    }

    /// Current token only; storage failures read as no token.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read session token");
            None
        })
    }

    /// Persists a new session and announces it.
    pub fn write(&self, token: &str, user: &User) -> ClientResult<()> {
        let raw_user = serde_json::to_string(user)?;

        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &raw_user)?;

        info!(user = %user.display_name(), "Session started");
        let _ = self.events.send(SessionEvent::Started { user: user.clone() });
        Ok(())
    }

    /// Removes the persisted session and announces it.
    pub fn clear(&self) -> ClientResult<()> {
        self.remove_entries()?;
        info!("Session ended");
        let _ = self.events.send(SessionEvent::Ended);
        Ok(())
    }

    /// Tears the session down after `service` rejected the token.
    ///
    /// Storage failures are logged; the event is published regardless so
    /// listeners stop treating the session as valid.
    pub fn expire(&self, service: ServiceKind) {
        if let Err(e) = self.remove_entries() {
            warn!(error = %e, %service, "Failed to clear expired session");
        }
        warn!(%service, "Session rejected by service, cleared");
        let _ = self.events.send(SessionEvent::Expired { service });
    }

    fn remove_entries(&self) -> StorageResult<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        debug!("Session entries removed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use backoffice_core::RecordId;

    fn store() -> (Arc<MemoryStore>, SessionStore) {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        (storage, session)
    }

    fn user_a() -> User {
        User {
            id: Some(RecordId::Number(1)),
            name: Some("A".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store_reads_empty_session() {
        let (_, session) = store();
        assert_eq!(session.read(), Session::default());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_write_persists_exact_user_json() {
        let (storage, session) = store();
        session.write("t1", &user_a()).unwrap();

        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
        assert_eq!(
            storage.get(USER_KEY).unwrap().as_deref(),
            Some(r#"{"id":1,"name":"A"}"#)
        );

        let read = session.read();
        assert_eq!(read.token.as_deref(), Some("t1"));
        assert_eq!(read.authenticated_user(), Some(&user_a()));
    }

    #[test]
    fn test_corrupt_user_heals_without_event() {
        let (storage, session) = store();
        let mut events = session.subscribe();
        storage.set(TOKEN_KEY, "t1").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        assert_eq!(session.read(), Session::default());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_token_without_user_is_not_authenticated() {
        let (storage, session) = store();
        storage.set(TOKEN_KEY, "t1").unwrap();
        let read = session.read();
        assert_eq!(read.token.as_deref(), Some("t1"));
        assert_eq!(read.authenticated_user(), None);
    }

    #[test]
    fn test_mutations_publish_events() {
        let (_, session) = store();
        let mut events = session.subscribe();

        session.write("t1", &user_a()).unwrap();
        session.clear().unwrap();
        session.expire(ServiceKind::Sales);

        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Started { user: user_a() }
        );
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Ended);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Expired {
                service: ServiceKind::Sales
            }
        );
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let (storage, session) = store();
        session.write("t1", &user_a()).unwrap();
        session.clear().unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(session.token(), None);
    }
}
