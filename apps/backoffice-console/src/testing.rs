//! Test fixtures: one axum server standing in for all four services.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use backoffice_client::{ClientConfig, MemoryStore};
use backoffice_core::ServiceKind;
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Shared {
    seen: Mutex<Vec<SeenRequest>>,
    replies: Mutex<HashMap<String, (StatusCode, Value)>>,
}

pub(crate) struct FakeService {
    base_url: String,
    shared: Arc<Shared>,
}

impl FakeService {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(reply).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeService {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.shared.replies.lock().unwrap().insert(
            format!("{} {}", method, path),
            (StatusCode::from_u16(status).unwrap(), body),
        );
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.shared.seen.lock().unwrap().clone()
    }
}

async fn reply(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let seen = SeenRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    let key = format!("{} {}", seen.method, seen.path);
    shared.seen.lock().unwrap().push(seen);

    match shared.replies.lock().unwrap().get(&key).cloned() {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (StatusCode::OK, Json(json!({}))).into_response(),
    }
}

/// App state with every service pointed at `fake` and an in-memory session.
pub(crate) fn state_for(fake: &FakeService) -> AppState {
    let mut config = ClientConfig::default();
    for kind in ServiceKind::ALL {
        config.services.set(kind, fake.base_url.clone());
    }
    AppState::with_storage(config, Arc::new(MemoryStore::new())).unwrap()
}
