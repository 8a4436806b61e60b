//! # Resource Services
//!
//! Typed CRUD over one [`ApiClient`] per resource.
//!
//! ## Operations
//! ```text
//! ┌──────────────────┬──────────────────────────┬─────────────────────────┐
//! │ Operation        │ Request                  │ Pre-flight              │
//! ├──────────────────┼──────────────────────────┼─────────────────────────┤
//! │ list             │ GET    /<resource>       │                         │
//! │ get_by_id(id)    │ GET    /<resource>/:id   │                         │
//! │ create(input)    │ POST   /<resource>       │ R::create_body          │
//! │ update(id, input)│ PUT    /<resource>/:id   │ R::update_body          │
//! │ delete(id)       │ DELETE /<resource>/:id   │                         │
//! │ health_check     │ GET    /db/health        │                         │
//! │ service_health   │ GET    /health           │                         │
//! └──────────────────┴──────────────────────────┴─────────────────────────┘
//! ```
//!
//! Payloads are returned as the server sent them.

mod auth;
mod products;
mod sales;

use std::marker::PhantomData;

use backoffice_core::resource::{Products, Refunds, Resource, Sales, Users};
use backoffice_core::RecordId;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::api_client::ApiClient;
use crate::error::ClientResult;

pub use auth::AuthApi;

/// CRUD service for resource `R`.
pub struct ResourceService<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        ResourceService {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for ResourceService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("client", &self.client)
            .finish()
    }
}

pub type UsersService = ResourceService<Users>;
pub type ProductsService = ResourceService<Products>;
pub type SalesService = ResourceService<Sales>;
pub type RefundsService = ResourceService<Refunds>;

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        ResourceService {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn list(&self) -> ClientResult<Value> {
        self.client.get(&[R::PATH]).await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> ClientResult<Value> {
        let id = id.to_string();
        self.client.get(&[R::PATH, id.as_str()]).await
    }

    /// Validates `input`, then posts it. Fails before any request when a
    /// required field is missing.
    pub async fn create(&self, input: &R::Input) -> ClientResult<Value> {
        let body = R::create_body(input, Utc::now())?;
        debug!(resource = R::PATH, ?body, "Creating record");
        self.client.post(&[R::PATH], &body).await
    }

    pub async fn update(&self, id: &RecordId, input: &R::Input) -> ClientResult<Value> {
        let body = R::update_body(input)?;
        debug!(resource = R::PATH, %id, ?body, "Updating record");
        let id = id.to_string();
        self.client.put(&[R::PATH, id.as_str()], &body).await
    }

    pub async fn delete(&self, id: &RecordId) -> ClientResult<Value> {
        let id = id.to_string();
        self.client.delete(&[R::PATH, id.as_str()]).await
    }

    /// Database health of the service.
    pub async fn health_check(&self) -> ClientResult<Value> {
        self.client.get(&["db", "health"]).await
    }

    /// Liveness of the service itself.
    pub async fn service_health(&self) -> ClientResult<Value> {
        self.client.get(&["health"]).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{ApiClientConfig, ApiClientFactory};
    use crate::navigation::NoOpNavigator;
    use crate::session::SessionStore;
    use crate::storage::MemoryStore;
    use crate::testing::FakeBackend;
    use crate::ClientError;
    use backoffice_core::resource::{ProductInput, RefundInput, SaleInput, UserInput};
    use backoffice_core::ServiceKind;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;

    async fn service<R: Resource>(backend: &FakeBackend) -> (SessionStore, ResourceService<R>) {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        let factory = ApiClientFactory::new(session.clone(), Arc::new(NoOpNavigator));
        let config = ApiClientConfig::new(R::SERVICE, Url::parse(backend.base_url()).unwrap());
        (session, ResourceService::new(factory.create(config).unwrap()))
    }

    #[tokio::test]
    async fn test_crud_paths() {
        let backend = FakeBackend::start().await;
        let (_, users) = service::<Users>(&backend).await;
        let input = UserInput {
            name: Some("Ana".into()),
            email: Some("ana@example.com".into()),
        };

        users.list().await.unwrap();
        users.get_by_id(&RecordId::Number(5)).await.unwrap();
        users.create(&input).await.unwrap();
        users.update(&RecordId::from("u-7"), &input).await.unwrap();
        users.delete(&RecordId::Number(5)).await.unwrap();
        users.health_check().await.unwrap();
        users.service_health().await.unwrap();

        let seen: Vec<String> = backend
            .requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect();
        assert_eq!(
            seen,
            [
                "GET /users",
                "GET /users/5",
                "POST /users",
                "PUT /users/u-7",
                "DELETE /users/5",
                "GET /db/health",
                "GET /health",
            ]
        );
        assert_eq!(
            backend.requests()[2].body,
            Some(json!({"name": "Ana", "email": "ana@example.com"}))
        );
    }

    #[tokio::test]
    async fn test_ids_are_single_segments() {
        let backend = FakeBackend::start().await;
        let (_, sales) = service::<Sales>(&backend).await;
        sales.get_by_id(&RecordId::from("a/b c")).await.unwrap();
        assert_eq!(backend.requests()[0].path, "/sales/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_payload_returned_verbatim() {
        let backend = FakeBackend::start().await;
        let payload = json!([{"id": 1, "name": "Tea", "price": 2.5, "tags": ["hot"]}]);
        backend.respond("GET", "/products", 200, payload.clone());
        let (_, products) = service::<Products>(&backend).await;
        assert_eq!(products.list().await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_validation_sends_nothing() {
        let backend = FakeBackend::start().await;
        let (_, users) = service::<Users>(&backend).await;
        let (_, products) = service::<Products>(&backend).await;
        let (_, sales) = service::<Sales>(&backend).await;
        let (_, refunds) = service::<Refunds>(&backend).await;
        let id = RecordId::Number(1);

        let errors = vec![
            users.create(&UserInput::default()).await.unwrap_err(),
            users.update(&id, &UserInput::default()).await.unwrap_err(),
            products.create(&ProductInput::default()).await.unwrap_err(),
            products.update(&id, &ProductInput::default()).await.unwrap_err(),
            sales.create(&SaleInput::default()).await.unwrap_err(),
            refunds.create(&RefundInput::default()).await.unwrap_err(),
            refunds.update(&id, &RefundInput::default()).await.unwrap_err(),
        ];

        for err in errors {
            assert!(matches!(err, ClientError::Validation(_)), "{:?}", err);
        }
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_sales_create_fills_fecha() {
        let backend = FakeBackend::start().await;
        let (_, sales) = service::<Sales>(&backend).await;
        let input = SaleInput {
            id: Some(RecordId::Number(10)),
            producto: Some("Cafe".into()),
            cantidad: Some(2),
            precio_unitario: Some(3.5),
            cliente: Some("Luis".into()),
            vendedor: Some(RecordId::Number(4)),
            fecha: None,
        };

        let before = Utc::now();
        sales.create(&input).await.unwrap();

        let body = backend.requests()[0].body.clone().unwrap();
        assert_eq!(body["id"], json!(10));
        assert_eq!(body["producto"], json!("Cafe"));
        assert_eq!(body["cantidad"], json!(2));
        assert_eq!(body["precioUnitario"], json!(3.5));
        assert_eq!(body["cliente"], json!("Luis"));
        assert_eq!(body["vendedor"], json!(4));

        let fecha = body["fecha"].as_str().unwrap();
        assert!(fecha.ends_with('Z'));
        let parsed = chrono::DateTime::parse_from_rfc3339(fecha).unwrap();
        assert!(parsed.timestamp_millis() >= before.timestamp_millis());
    }

    #[tokio::test]
    async fn test_sales_update_without_fields_is_sent() {
        let backend = FakeBackend::start().await;
        let (_, sales) = service::<Sales>(&backend).await;
        sales
            .update(&RecordId::Number(3), &SaleInput::default())
            .await
            .unwrap();
        let request = &backend.requests()[0];
        assert_eq!(request.path, "/sales/3");
        assert_eq!(request.body, Some(json!({})));
    }

    #[tokio::test]
    async fn test_logout_removes_authorization() {
        let backend = FakeBackend::start().await;
        let (session, refunds) = service::<Refunds>(&backend).await;
        session
            .write("t1", &backoffice_core::User::default())
            .unwrap();
        refunds.list().await.unwrap();
        session.clear().unwrap();
        refunds.list().await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer t1"));
        assert_eq!(requests[1].authorization, None);
        assert_eq!(refunds.client().service(), ServiceKind::Refunds);
    }
}
