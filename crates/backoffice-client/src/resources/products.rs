//! Product reads beyond plain CRUD.

use backoffice_core::resource::Products;
use serde_json::Value;

use super::ResourceService;
use crate::error::ClientResult;

impl ResourceService<Products> {
    /// Products joined with the users that manage them
    /// (`GET /products/with-users`).
    pub async fn list_with_users(&self) -> ClientResult<Value> {
        self.client().get(&["products", "with-users"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::{ApiClientConfig, ApiClientFactory};
    use crate::navigation::NoOpNavigator;
    use crate::session::SessionStore;
    use crate::storage::MemoryStore;
    use crate::testing::FakeBackend;
    use backoffice_core::ServiceKind;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_with_users() {
        let backend = FakeBackend::start().await;
        backend.respond(
            "GET",
            "/products/with-users",
            200,
            json!([{"id": 1, "user": {"name": "Ana"}}]),
        );
        let factory = ApiClientFactory::new(
            SessionStore::new(Arc::new(MemoryStore::new())),
            Arc::new(NoOpNavigator),
        );
        let client = factory
            .create(ApiClientConfig::new(
                ServiceKind::Products,
                backend.base_url().parse().unwrap(),
            ))
            .unwrap();

        let products = ResourceService::<Products>::new(client);
        let payload = products.list_with_users().await.unwrap();
        assert_eq!(payload[0]["user"]["name"], json!("Ana"));
    }
}
