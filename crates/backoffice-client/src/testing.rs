//! In-process fake of the backend services for client tests.
//!
//! Binds an axum server to `127.0.0.1:0`, records every request and answers
//! with scripted responses keyed by `"<METHOD> <path>"`. Unscripted routes
//! answer `200 {}`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;

/// A request as the fake backend saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct Scripted {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Debug, Default)]
struct FakeState {
    requests: Mutex<Vec<RecordedRequest>>,
    routes: Mutex<HashMap<String, Scripted>>,
}

pub(crate) struct FakeBackend {
    base_url: String,
    state: Arc<FakeState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeBackend {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scripts a JSON response.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.script(method, path, status, "application/json", body.to_string());
    }

    /// Scripts a plain-text response.
    pub fn respond_text(&self, method: &str, path: &str, status: u16, body: &str) {
        self.script(method, path, status, "text/plain", body.to_string());
    }

    fn script(&self, method: &str, path: &str, status: u16, content_type: &'static str, body: String) {
        let scripted = Scripted {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body,
        };
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), scripted);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    };
    let key = format!("{} {}", recorded.method, recorded.path);
    state.requests.lock().unwrap().push(recorded);

    let scripted = state.routes.lock().unwrap().get(&key).cloned();
    match scripted {
        Some(s) => (s.status, [(header::CONTENT_TYPE, s.content_type)], s.body).into_response(),
        None => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{}".to_string(),
        )
            .into_response(),
    }
}
