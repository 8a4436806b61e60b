//! # Domain Types
//!
//! Core types shared by every layer of the backoffice client.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ServiceKind    │   │    RecordId     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Users          │   │  Number(i64)    │   │  id?            │       │
//! │  │  Products       │   │  Text(String)   │   │  name?          │       │
//! │  │  Sales          │   │  (untagged)     │   │  email?         │       │
//! │  │  Refunds        │   │                 │   │  ..extra        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Credentials    │   │  Registration   │   │  LoginResponse  │       │
//! │  │  email          │   │  name, email    │   │  token          │       │
//! │  │  password       │   │  password       │   │  user           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records returned by the services are server-defined. `User` keeps unknown
//! fields in `extra` so a persisted user serializes exactly as it arrived.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// =============================================================================
// Service Kind
// =============================================================================

/// One of the four independently deployed backend services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Users service (also hosts `/auth/*`).
    Users,
    /// Products service.
    Products,
    /// Sales service.
    Sales,
    /// Refunds service.
    Refunds,
}

impl ServiceKind {
    /// Every service, in configuration order.
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Users,
        ServiceKind::Products,
        ServiceKind::Sales,
        ServiceKind::Refunds,
    ];

    /// Returns the lowercase service name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Users => "users",
            ServiceKind::Products => "products",
            ServiceKind::Sales => "sales",
            ServiceKind::Refunds => "refunds",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" | "user" => Ok(ServiceKind::Users),
            "products" | "product" => Ok(ServiceKind::Products),
            "sales" | "sale" => Ok(ServiceKind::Sales),
            "refunds" | "refund" => Ok(ServiceKind::Refunds),
            other => Err(CoreError::UnknownService(other.to_string())),
        }
    }
}

// =============================================================================
// Record Id
// =============================================================================

/// Identifier of a server record.
///
/// The services mix numeric and string identifiers, so both are accepted
/// and serialized back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// Parses integers as `Number`, anything else as `Text`.
impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(RecordId::Number)
            .unwrap_or_else(|_| RecordId::Text(s.to_string())))
    }
}

// =============================================================================
// User
// =============================================================================

/// A user record as returned by the users service.
///
/// ## Persistence
/// This is the value stored under the `user` session entry. Absent fields are
/// skipped and unknown fields are flattened back, so
/// `{"id":1,"name":"A"}` is persisted byte-for-byte as received.
///
/// Decoding never rejects an object: an `id` that is not an integer or
/// string, or a `name`/`email` that is not a string, stays in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Any other field the service returns (role, created_at, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for User {
    fn from(mut fields: Map<String, Value>) -> Self {
        let id = take(&mut fields, "id", |value| match value {
            Value::Number(n) => n.as_i64().map(RecordId::Number),
            Value::String(s) => Some(RecordId::Text(s.clone())),
            _ => None,
        });
        let name = take(&mut fields, "name", |value| value.as_str().map(str::to_string));
        let email = take(&mut fields, "email", |value| value.as_str().map(str::to_string));
        User {
            id,
            name,
            email,
            extra: fields,
        }
    }
}

/// Moves `key` out of `fields` only if `convert` accepts it.
fn take<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = fields.get(key).and_then(convert)?;
    fields.remove(key);
    Some(value)
}

impl User {
    /// Best-effort label for display: name, then email, then id.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .or_else(|| self.id.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "unknown user".to_string())
    }
}

// =============================================================================
// Auth Payloads
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer credential.
    pub token: String,
    pub user: User,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_kind_parsing() {
        assert_eq!("users".parse::<ServiceKind>().unwrap(), ServiceKind::Users);
        assert_eq!("Product".parse::<ServiceKind>().unwrap(), ServiceKind::Products);
        assert_eq!("sales".parse::<ServiceKind>().unwrap(), ServiceKind::Sales);
        assert_eq!("refunds".parse::<ServiceKind>().unwrap(), ServiceKind::Refunds);
        assert!("orders".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn test_record_id_serialization() {
        assert_eq!(serde_json::to_string(&RecordId::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RecordId::from("V-1")).unwrap(), "\"V-1\"");

        let id: RecordId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id, RecordId::Number(42));
        let id: RecordId = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(id, RecordId::Text("abc".into()));
    }

    #[test]
    fn test_record_id_from_str() {
        assert_eq!("12".parse::<RecordId>().unwrap(), RecordId::Number(12));
        assert_eq!(
            "a1b2".parse::<RecordId>().unwrap(),
            RecordId::Text("a1b2".into())
        );
    }

    #[test]
    fn test_user_serializes_exactly_as_received() {
        let user: User = serde_json::from_str(r#"{"id":1,"name":"A"}"#).unwrap();
        assert_eq!(user.id, Some(RecordId::Number(1)));
        assert_eq!(user.email, None);
        assert_eq!(serde_json::to_string(&user).unwrap(), r#"{"id":1,"name":"A"}"#);
    }

    #[test]
    fn test_user_keeps_unknown_fields() {
        let user: User =
            serde_json::from_value(json!({"id": "u-9", "role": "admin", "email": "a@b.c"}))
                .unwrap();
        assert_eq!(user.extra.get("role"), Some(&json!("admin")));
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back, json!({"id": "u-9", "email": "a@b.c", "role": "admin"}));
    }

    #[test]
    fn test_user_tolerates_unexpected_field_types() {
        let user: User =
            serde_json::from_value(json!({"id": 1.5, "name": 7, "email": "a@b.c"})).unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.name, None);
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
        assert_eq!(user.extra.get("id"), Some(&json!(1.5)));
        assert_eq!(user.display_name(), "a@b.c");

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back, json!({"id": 1.5, "name": 7, "email": "a@b.c"}));

        let user: User = serde_json::from_value(json!({"id": null})).unwrap();
        assert_eq!(user.id, None);
        assert!(serde_json::from_value::<User>(json!([1])).is_err());
    }

    #[test]
    fn test_user_display_name() {
        let mut user = User {
            id: Some(RecordId::Number(3)),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "3");
        user.email = Some("x@y.z".into());
        assert_eq!(user.display_name(), "x@y.z");
        user.name = Some("Ana".into());
        assert_eq!(user.display_name(), "Ana");
    }

    #[test]
    fn test_login_response_parsing() {
        let resp: LoginResponse =
            serde_json::from_value(json!({"token": "t1", "user": {"id": 1, "name": "A"}}))
                .unwrap();
        assert_eq!(resp.token, "t1");
        assert_eq!(resp.user.name.as_deref(), Some("A"));
    }
}
