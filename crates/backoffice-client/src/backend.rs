//! # Backend
//!
//! Every service client wired from one configuration.
//!
//! ## Usage Pattern
//! ```rust,ignore
//! let backend = Backend::connect(&config, session, navigator)?;
//!
//! let products = backend.products().list().await?;
//! let profile = backend.auth().get_profile().await?;
//! ```

use std::sync::Arc;

use backoffice_core::ServiceKind;
use serde_json::Value;
use tracing::info;

use crate::api_client::{ApiClientConfig, ApiClientFactory};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::navigation::Navigator;
use crate::resources::{AuthApi, ProductsService, RefundsService, SalesService, UsersService};
use crate::session::SessionStore;

/// The four service clients plus the auth API.
#[derive(Debug, Clone)]
pub struct Backend {
    session: SessionStore,
    users: UsersService,
    products: ProductsService,
    sales: SalesService,
    refunds: RefundsService,
    auth: AuthApi,
}

impl Backend {
    /// Builds one client per service. Fails only on an invalid base URL.
    pub fn connect(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let factory = ApiClientFactory::new(session.clone(), navigator);
        let client = |service| -> ClientResult<_> {
            factory.create(ApiClientConfig::from_config(config, service)?)
        };

        let users = client(ServiceKind::Users)?;
        let backend = Backend {
            session,
            auth: AuthApi::new(users.clone()),
            users: UsersService::new(users),
            products: ProductsService::new(client(ServiceKind::Products)?),
            sales: SalesService::new(client(ServiceKind::Sales)?),
            refunds: RefundsService::new(client(ServiceKind::Refunds)?),
        };

        info!(
            users = %config.services.users,
            products = %config.services.products,
            sales = %config.services.sales,
            refunds = %config.services.refunds,
            "Backend clients ready"
        );
        Ok(backend)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn users(&self) -> &UsersService {
        &self.users
    }

    pub fn products(&self) -> &ProductsService {
        &self.products
    }

    pub fn sales(&self) -> &SalesService {
        &self.sales
    }

    pub fn refunds(&self) -> &RefundsService {
        &self.refunds
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    /// `GET /health` on one service.
    pub async fn service_health(&self, service: ServiceKind) -> ClientResult<Value> {
        match service {
            ServiceKind::Users => self.users.service_health().await,
            ServiceKind::Products => self.products.service_health().await,
            ServiceKind::Sales => self.sales.service_health().await,
            ServiceKind::Refunds => self.refunds.service_health().await,
        }
    }

    /// `GET /db/health` on one service.
    pub async fn health_check(&self, service: ServiceKind) -> ClientResult<Value> {
        match service {
            ServiceKind::Users => self.users.health_check().await,
            ServiceKind::Products => self.products.health_check().await,
            ServiceKind::Sales => self.sales.health_check().await,
            ServiceKind::Refunds => self.refunds.health_check().await,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
