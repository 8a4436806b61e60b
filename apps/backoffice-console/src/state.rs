//! # Application State
//!
//! Everything a command needs, built once per invocation.
//!
//! ## Startup Sequence
//! 1. Load `ClientConfig` (defaults < backoffice.toml < env)
//! 2. Open the session storage (file under the data dir)
//! 3. Connect the four service clients
//! 4. Create and initialize the auth context

use std::sync::Arc;

use backoffice_client::{
    AuthContext, Backend, ClientConfig, ClientResult, FileStore, KeyValueStore, MemoryStore,
    RouteState, SessionStore,
};
use tracing::{info, warn};

/// Shared state for one shell invocation.
pub struct AppState {
    pub config: ClientConfig,
    pub routes: Arc<RouteState>,
    pub backend: Backend,
    pub auth: AuthContext,
}

impl AppState {
    /// Builds state on the configured session file. Falls back to an
    /// in-memory session when no data directory can be determined.
    pub fn build(config: ClientConfig) -> ClientResult<Self> {
        let storage: Arc<dyn KeyValueStore> = match config.session_path() {
            Some(path) => {
                info!(path = %path.display(), "Using session file");
                Arc::new(FileStore::new(path))
            }
            None => {
                warn!("No data directory available, session will not persist");
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        let routes = Arc::new(RouteState::default());
        let session = SessionStore::new(storage);
        let backend = Backend::connect(&config, session.clone(), routes.clone())?;
        let auth = AuthContext::new(session, backend.auth().clone());
        auth.initialize();

        Ok(AppState {
            config,
            routes,
            backend,
            auth,
        })
    }

    /// True when a service rejected the session during this invocation.
    pub fn session_expired(&self) -> bool {
        self.routes.was_forced()
    }
}
