//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Pre-flight field checks                        │
//! │                                                                         │
//! │  backoffice-client errors (separate crate)                             │
//! │  └── ClientError      - Transport, status, storage failures            │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── CommandError     - What the operator sees (code + message)        │
//! │                                                                         │
//! │  Flow: ValidationError → ClientError → CommandError → Terminal         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A validation error is always raised before a request leaves the process.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Unknown service name (e.g. from a command line argument).
    #[error("Unknown service: '{0}'. Valid options: users, products, sales, refunds")]
    UnknownService(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the required-field checks that run before `create`/`update`
/// issue any request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are absent or empty.
    ///
    /// ## When This Occurs
    /// ```text
    /// products.create({ name: "Tea" })
    ///      │
    ///      ▼
    /// required: name ✓, price ✗
    ///      │
    ///      ▼
    /// MissingFields { resource: "products", fields: ["price"] }
    ///      │
    ///      ▼
    /// "products: missing required fields: price"
    /// ```
    #[error("{resource}: missing required fields: {}", .fields.join(", "))]
    MissingFields {
        resource: String,
        fields: Vec<String>,
    },
}

impl ValidationError {
    /// Creates a MissingFields error.
    pub fn missing(resource: impl Into<String>, fields: &[&str]) -> Self {
        ValidationError::MissingFields {
            resource: resource.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    /// Returns the names of the missing fields.
    pub fn fields(&self) -> &[String] {
        match self {
            ValidationError::MissingFields { fields, .. } => fields,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
