//! # backoffice-core: Pure Request Model for the Backoffice Client
//!
//! This crate holds the resource schemas, record types and required-field
//! checks shared by the HTTP client and the console. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Backoffice Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 backoffice-console (operator shell)             │   │
//! │  │    login ──► status ──► products list ──► sales create ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │         backoffice-client (session, auth, HTTP services)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ backoffice-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │ resource  │  │ validation │  │  error   │  │   │
//! │  │   │   User    │  │ Products  │  │  Required  │  │ Missing  │  │   │
//! │  │   │ RecordId  │  │  Sales    │  │  Presence  │  │  Fields  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK READS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Service kinds, record ids, users and login payloads
//! - [`resource`] - Per-resource inputs, request bodies and defaults
//! - [`validation`] - Required-field collector
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::resource::{ProductInput, Products, Resource};
//! use chrono::Utc;
//!
//! let input = ProductInput {
//!     name: Some("Tea".into()),
//!     price: Some(2.5),
//!     stock: None,
//! };
//!
//! let body = Products::create_body(&input, Utc::now()).unwrap();
//! assert_eq!(body.stock, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod resource;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use resource::Resource;
pub use types::*;
pub use validation::ValidationResult;
