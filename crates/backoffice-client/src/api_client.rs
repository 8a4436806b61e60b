//! # API Client
//!
//! One HTTP client per backend service, all built by the same factory.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ApiClient::send                                 │
//! │                                                                         │
//! │  1. base_url + path segments   http://host:3003 + [sales, 7]           │
//! │                                 └─► http://host:3003/sales/7            │
//! │  2. default headers             Content-Type: application/json         │
//! │  3. BearerAuth                  Authorization: Bearer <token>          │
//! │  4. send (no retry, no timeout)                                        │
//! │  5. status check                2xx ─► decode body (empty ─► null)     │
//! │                                 else ─► ClientError::Status            │
//! │  6. UnauthorizedGuard           401 ─► expire session, go to /login    │
//! │  7. return result unchanged                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use backoffice_core::ServiceKind;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::interceptor::{BearerAuth, UnauthorizedGuard};
use crate::navigation::Navigator;
use crate::session::SessionStore;

// =============================================================================
// Client Config
// =============================================================================

/// Immutable settings of one service client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub service: ServiceKind,
    pub base_url: Url,
    pub default_headers: HeaderMap,
}

impl ApiClientConfig {
    /// Config with the JSON content type every service expects.
    pub fn new(service: ServiceKind, base_url: Url) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        ApiClientConfig {
            service,
            base_url,
            default_headers,
        }
    }

    /// Reads `service`'s base address from the client configuration.
    pub fn from_config(config: &ClientConfig, service: ServiceKind) -> ClientResult<Self> {
        Ok(Self::new(service, config.service_url(service)?))
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds service clients sharing one session and one navigator.
#[derive(Clone)]
pub struct ApiClientFactory {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClientFactory {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        ApiClientFactory { session, navigator }
    }

    pub fn create(&self, config: ApiClientConfig) -> ClientResult<ApiClient> {
        let http = reqwest::Client::builder()
            .default_headers(config.default_headers.clone())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        debug!(service = %config.service, base_url = %config.base_url, "API client created");

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                auth: BearerAuth::new(self.session.clone()),
                guard: UnauthorizedGuard::new(self.session.clone(), self.navigator.clone()),
                config,
                http,
            }),
        })
    }
}

// =============================================================================
// API Client
// =============================================================================

/// HTTP client bound to one service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ApiClientConfig,
    http: reqwest::Client,
    auth: BearerAuth,
    guard: UnauthorizedGuard,
}

impl ApiClient {
    pub fn service(&self) -> ServiceKind {
        self.inner.config.service
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.config.base_url
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded
    /// on its own, so an id containing `/` stays one segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.config.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        self.send(Method::GET, segments, None::<&()>).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, segments, Some(body)).await
    }

    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, segments, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        self.send(Method::DELETE, segments, None::<&()>).await
    }

    async fn send<B, T>(&self, method: Method, segments: &[&str], body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let service = self.service();
        let url = self.url(segments);
        debug!(%service, %method, %url, "Sending request");

        let mut request = self.inner.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.inner.auth.apply(request);

        let result = self.execute(request).await;
        if let Err(err) = &result {
            self.inner.guard.inspect(service, err);
        }
        result
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let service = self.service();
        let transport = |source| ClientError::Transport { service, source };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            debug!(%service, %status, "Service returned error status");
            return Err(ClientError::Status {
                service,
                status,
                body: error_body(&bytes),
            });
        }

        decode_body(&bytes).map_err(|e| ClientError::Decode {
            service,
            message: e.to_string(),
        })
    }
}

/// Decodes a success body. An empty body reads as JSON `null`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(bytes)
    }
}

/// Error bodies: JSON when parseable, otherwise the raw text.
fn error_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// =============================================================================
// Unit Tests
// =============================================================================
