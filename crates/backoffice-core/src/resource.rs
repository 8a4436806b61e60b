//! # Resource Schemas
//!
//! Typed inputs and request bodies for the four CRUD resources, plus the
//! required-field rules each one enforces before a request is sent.
//!
//! ## Required Fields
//! ```text
//! ┌──────────┬───────────────────────────────────┬────────────────────────┐
//! │ Resource │ create requires                   │ update requires        │
//! ├──────────┼───────────────────────────────────┼────────────────────────┤
//! │ users    │ name, email                       │ name, email            │
//! │ products │ name, price   (stock → 0)         │ name, price (stock→0)  │
//! │ sales    │ id, producto, cantidad,           │ nothing                │
//! │          │ precioUnitario, cliente, vendedor │                        │
//! │          │ (fecha → now)                     │                        │
//! │ refunds  │ sale_id, product_name,            │ the same 8 + status    │
//! │          │ client_name, seller_id, quantity, │                        │
//! │          │ unit_price, total_amount, reason  │                        │
//! │          │ (status → "pending")              │                        │
//! └──────────┴───────────────────────────────────┴────────────────────────┘
//! ```
//!
//! The sales/refunds asymmetry on update is how the services have always
//! been called; it is kept as is.
//!
//! ## Flow
//! ```text
//! SaleInput ──► Sales::create_body(&input, now) ──► SaleBody ──► POST /sales
//!                        │
//!                        └── missing field? ──► ValidationError (no request)
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RecordId, ServiceKind};
use crate::validation::{Required, ValidationResult};

/// Stock sent for products when none is supplied.
pub const DEFAULT_PRODUCT_STOCK: i64 = 0;

/// Status sent for new refunds when none is supplied.
pub const DEFAULT_REFUND_STATUS: &str = "pending";

// =============================================================================
// Resource Trait
// =============================================================================

/// A CRUD resource exposed by one backend service.
///
/// Implementors are zero-sized markers; the client crate builds one generic
/// service per marker.
pub trait Resource: Send + Sync + 'static {
    /// Service hosting this resource.
    const SERVICE: ServiceKind;

    /// Collection path segment (`users`, `products`, ...).
    const PATH: &'static str;

    /// Fields supplied by the caller for create and update.
    type Input: std::fmt::Debug + Send + Sync;

    /// Body sent with `POST /<resource>`.
    type CreateBody: Serialize + std::fmt::Debug + Send + Sync;

    /// Body sent with `PUT /<resource>/:id`.
    type UpdateBody: Serialize + std::fmt::Debug + Send + Sync;

    /// Validates `input` and builds the create body. `now` fills timestamp
    /// defaults.
    fn create_body(input: &Self::Input, now: DateTime<Utc>) -> ValidationResult<Self::CreateBody>;

    /// Validates `input` and builds the update body.
    fn update_body(input: &Self::Input) -> ValidationResult<Self::UpdateBody>;
}

// =============================================================================
// Users
// =============================================================================

/// Users resource marker.
#[derive(Debug, Clone, Copy)]
pub struct Users;

/// Caller-supplied user fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body for user create/update. Passwords are never sent through CRUD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserBody {
    pub name: String,
    pub email: String,
}

impl Users {
    fn body(input: &UserInput) -> ValidationResult<UserBody> {
        let mut check = Required::new(Self::PATH);
        let name = check.field("name", &input.name);
        let email = check.field("email", &input.email);
        let (Some(name), Some(email)) = (name, email) else {
            return Err(check.into_error());
        };
        Ok(UserBody { name, email })
    }
}

impl Resource for Users {
    const SERVICE: ServiceKind = ServiceKind::Users;
    const PATH: &'static str = "users";

    type Input = UserInput;
    type CreateBody = UserBody;
    type UpdateBody = UserBody;

    fn create_body(input: &UserInput, _now: DateTime<Utc>) -> ValidationResult<UserBody> {
        Users::body(input)
    }

    fn update_body(input: &UserInput) -> ValidationResult<UserBody> {
        Users::body(input)
    }
}

// =============================================================================
// Products
// =============================================================================

/// Products resource marker.
#[derive(Debug, Clone, Copy)]
pub struct Products;

/// Caller-supplied product fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// Body for product create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductBody {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl Products {
    fn body(input: &ProductInput) -> ValidationResult<ProductBody> {
        let mut check = Required::new(Self::PATH);
        let name = check.field("name", &input.name);
        let price = check.field("price", &input.price);
        let (Some(name), Some(price)) = (name, price) else {
            return Err(check.into_error());
        };
        Ok(ProductBody {
            name,
            price,
            stock: input.stock.unwrap_or(DEFAULT_PRODUCT_STOCK),
        })
    }
}

impl Resource for Products {
    const SERVICE: ServiceKind = ServiceKind::Products;
    const PATH: &'static str = "products";

    type Input = ProductInput;
    type CreateBody = ProductBody;
    type UpdateBody = ProductBody;

    fn create_body(input: &ProductInput, _now: DateTime<Utc>) -> ValidationResult<ProductBody> {
        Products::body(input)
    }

    fn update_body(input: &ProductInput) -> ValidationResult<ProductBody> {
        Products::body(input)
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Sales resource marker.
#[derive(Debug, Clone, Copy)]
pub struct Sales;

/// Caller-supplied sale fields. Field names follow the sales service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleInput {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub producto: Option<String>,
    #[serde(default)]
    pub cantidad: Option<i64>,
    #[serde(default, rename = "precioUnitario")]
    pub precio_unitario: Option<f64>,
    #[serde(default)]
    pub cliente: Option<String>,
    #[serde(default)]
    pub vendedor: Option<RecordId>,
    /// ISO-8601 timestamp; defaults to now on create.
    #[serde(default)]
    pub fecha: Option<String>,
}

/// Body for `POST /sales`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleBody {
    pub id: RecordId,
    pub producto: String,
    pub cantidad: i64,
    #[serde(rename = "precioUnitario")]
    pub precio_unitario: f64,
    pub cliente: String,
    pub vendedor: RecordId,
    pub fecha: String,
}

/// Body for `PUT /sales/:id`. Absent fields are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleUpdateBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<i64>,
    #[serde(rename = "precioUnitario", skip_serializing_if = "Option::is_none")]
    pub precio_unitario: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendedor: Option<RecordId>,
}

/// Formats a timestamp the way the sales service stores `fecha`
/// (`2024-05-01T12:30:00.000Z`).
pub fn sale_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Resource for Sales {
    const SERVICE: ServiceKind = ServiceKind::Sales;
    const PATH: &'static str = "sales";

    type Input = SaleInput;
    type CreateBody = SaleBody;
    type UpdateBody = SaleUpdateBody;

    fn create_body(input: &SaleInput, now: DateTime<Utc>) -> ValidationResult<SaleBody> {
        let mut check = Required::new(Self::PATH);
        let id = check.field("id", &input.id);
        let producto = check.field("producto", &input.producto);
        let cantidad = check.field("cantidad", &input.cantidad);
        let precio_unitario = check.field("precioUnitario", &input.precio_unitario);
        let cliente = check.field("cliente", &input.cliente);
        let vendedor = check.field("vendedor", &input.vendedor);

        let (
            Some(id),
            Some(producto),
            Some(cantidad),
            Some(precio_unitario),
            Some(cliente),
            Some(vendedor),
        ) = (id, producto, cantidad, precio_unitario, cliente, vendedor)
        else {
            return Err(check.into_error());
        };

        let fecha = input
            .fecha
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| sale_timestamp(now));

        Ok(SaleBody {
            id,
            producto,
            cantidad,
            precio_unitario,
            cliente,
            vendedor,
            fecha,
        })
    }

    fn update_body(input: &SaleInput) -> ValidationResult<SaleUpdateBody> {
        Ok(SaleUpdateBody {
            fecha: input.fecha.clone(),
            producto: input.producto.clone(),
            cantidad: input.cantidad,
            precio_unitario: input.precio_unitario,
            cliente: input.cliente.clone(),
            vendedor: input.vendedor.clone(),
        })
    }
}

// =============================================================================
// Refunds
// =============================================================================

/// Refunds resource marker.
#[derive(Debug, Clone, Copy)]
pub struct Refunds;

/// Caller-supplied refund fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundInput {
    #[serde(default)]
    pub sale_id: Option<RecordId>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub seller_id: Option<RecordId>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
    /// `None` when the field is absent; `Some(None)` for an explicit null.
    #[serde(
        default,
        deserialize_with = "explicit",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<Option<String>>,
}

fn explicit<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Body for refund create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundBody {
    pub sale_id: RecordId,
    pub product_name: String,
    pub client_name: String,
    pub seller_id: RecordId,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub reason: String,
    pub status: Option<String>,
}

/// How a refund body resolves `status`.
#[derive(Debug, Clone, Copy)]
enum StatusRule {
    /// Fall back to [`DEFAULT_REFUND_STATUS`] when the field is absent.
    /// An empty string or null is sent as given.
    Default,
    /// Status is a required field.
    Required,
}

impl Refunds {
    fn body(input: &RefundInput, rule: StatusRule) -> ValidationResult<RefundBody> {
        let mut check = Required::new(Self::PATH);
        let sale_id = check.field("sale_id", &input.sale_id);
        let product_name = check.field("product_name", &input.product_name);
        let client_name = check.field("client_name", &input.client_name);
        let seller_id = check.field("seller_id", &input.seller_id);
        let quantity = check.field("quantity", &input.quantity);
        let unit_price = check.field("unit_price", &input.unit_price);
        let total_amount = check.field("total_amount", &input.total_amount);
        let reason = check.field("reason", &input.reason);
        let status = match rule {
            StatusRule::Default => Some(
                input
                    .status
                    .clone()
                    .unwrap_or_else(|| Some(DEFAULT_REFUND_STATUS.to_string())),
            ),
            StatusRule::Required => check.field("status", &input.status),
        };

        let (
            Some(sale_id),
            Some(product_name),
            Some(client_name),
            Some(seller_id),
            Some(quantity),
            Some(unit_price),
            Some(total_amount),
            Some(reason),
            Some(status),
        ) = (
            sale_id,
            product_name,
            client_name,
            seller_id,
            quantity,
            unit_price,
            total_amount,
            reason,
            status,
        )
        else {
            return Err(check.into_error());
        };

        Ok(RefundBody {
            sale_id,
            product_name,
            client_name,
            seller_id,
            quantity,
            unit_price,
            total_amount,
            reason,
            status,
        })
    }
}

impl Resource for Refunds {
    const SERVICE: ServiceKind = ServiceKind::Refunds;
    const PATH: &'static str = "refunds";

    type Input = RefundInput;
    type CreateBody = RefundBody;
    type UpdateBody = RefundBody;

    fn create_body(input: &RefundInput, _now: DateTime<Utc>) -> ValidationResult<RefundBody> {
        Refunds::body(input, StatusRule::Default)
    }

    fn update_body(input: &RefundInput) -> ValidationResult<RefundBody> {
        Refunds::body(input, StatusRule::Required)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
