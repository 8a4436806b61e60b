//! Sale reads beyond plain CRUD.

use backoffice_core::resource::Sales;
use serde_json::Value;

use super::ResourceService;
use crate::error::ClientResult;

impl ResourceService<Sales> {
    /// Sales enriched with data from the other services
    /// (`GET /sales/with-external`).
    pub async fn list_with_external(&self) -> ClientResult<Value> {
        self.client().get(&["sales", "with-external"]).await
    }
}
