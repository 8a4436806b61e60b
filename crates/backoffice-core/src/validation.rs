//! # Validation Module
//!
//! Pre-flight field checks run before any create/update request is issued.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console (clap + serde)                                       │
//! │  ├── Argument parsing                                                  │
//! │  └── JSON --data deserialization into typed inputs                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (no I/O)                                         │
//! │  ├── Required fields present (non-empty, non-zero)                     │
//! │  └── Fails fast: nothing reaches the network                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend service                                              │
//! │  └── Whatever the service enforces (opaque to us)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Presence Rules
//! A field counts as present when it is set and not "empty":
//! strings must be non-empty, numbers non-zero (and not NaN). A price of `0`
//! or a quantity of `0` is therefore rejected, matching what the services
//! have always received from this client.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Presence
// =============================================================================

/// Whether a value counts as supplied for a required field.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for f64 {
    fn is_present(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Presence for crate::types::RecordId {
    fn is_present(&self) -> bool {
        match self {
            crate::types::RecordId::Number(n) => n.is_present(),
            crate::types::RecordId::Text(s) => s.is_present(),
        }
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().map_or(false, |v| v.is_present())
    }
}

// =============================================================================
// Required Field Collector
// =============================================================================

/// Collects missing required fields for one resource.
///
/// ## Usage
/// ```rust
/// use backoffice_core::validation::Required;
///
/// let name = Some("Tea".to_string());
/// let price: Option<f64> = None;
///
/// let mut check = Required::new("products");
/// let name = check.field("name", &name);
/// let price = check.field("price", &price);
///
/// let (Some(_name), Some(_price)) = (name, price) else {
///     let err = check.into_error();
///     assert_eq!(err.to_string(), "products: missing required fields: price");
///     return;
/// };
/// unreachable!();
/// ```
#[derive(Debug)]
pub struct Required {
    resource: &'static str,
    missing: Vec<&'static str>,
}

impl Required {
    pub fn new(resource: &'static str) -> Self {
        Required {
            resource,
            missing: Vec::new(),
        }
    }

    /// Returns the value when present, otherwise records `name` as missing.
    pub fn field<T: Presence + Clone>(&mut self, name: &'static str, value: &Option<T>) -> Option<T> {
        match value {
            Some(v) if v.is_present() => Some(v.clone()),
            _ => {
                self.missing.push(name);
                None
            }
        }
    }

    /// Names recorded as missing so far, in check order.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// Ok when nothing is missing.
    pub fn finish(self) -> ValidationResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::missing(self.resource, &self.missing)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
