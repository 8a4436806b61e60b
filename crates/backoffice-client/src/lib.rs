//! # backoffice-client: Session, Service Clients and Auth Context
//!
//! Everything between the operator shell and the four REST services.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI action                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ResourceService::create ── validation fails? ──► ClientError (no I/O) │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ApiClient ── BearerAuth ──► network ──► status check                  │
//! │                                            │                            │
//! │                         401 ◄──────────────┤                            │
//! │                          │                 ▼                            │
//! │          UnauthorizedGuard          decoded payload                     │
//! │          ├─ SessionStore::expire                                        │
//! │          └─ Navigator → /login                                          │
//! │                                                                         │
//! │  AuthContext ── login/logout ──► SessionStore ── events ──► AuthContext│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Service base URLs, storage location (TOML + env)
//! - [`storage`] - `KeyValueStore` with file and memory backends
//! - [`session`] - Persisted token/user and session events
//! - [`navigation`] - Routes and the `Navigator` seam
//! - [`interceptor`] - Bearer header and 401 handling
//! - [`api_client`] - Per-service HTTP clients and their factory
//! - [`resources`] - CRUD services and the auth API
//! - [`backend`] - All clients built from one config
//! - [`auth_context`] - Authentication state machine

pub mod api_client;
pub mod auth_context;
pub mod backend;
pub mod config;
pub mod error;
pub mod interceptor;
pub mod navigation;
pub mod resources;
pub mod session;
pub mod storage;

#[cfg(test)]
mod testing;

pub use api_client::{ApiClient, ApiClientConfig, ApiClientFactory};
pub use auth_context::{AuthContext, AuthPhase, AuthState, LoginOutcome};
pub use backend::Backend;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use navigation::{Navigator, NoOpNavigator, Route, RouteState};
pub use resources::{AuthApi, ResourceService};
pub use session::{Session, SessionEvent, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
