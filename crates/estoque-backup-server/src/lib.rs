//! Estoque Backup Server
//!
//! Minimal key-by-organization JSON blob store the mobile counter
//! pushes its backups to. Each POST fully replaces the payload stored
//! under the organization key; GET returns it verbatim. Storage is
//! process-lifetime only; the request/response contract is stable for
//! a durable reimplementation.

use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<HashMap<String, Value>>>,
    allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/backup/:org_key",
            post(store_backup).get(fetch_backup),
        )
        // the mobile counter posts here; same store, same rules
        .route("/api/backup/from-mobile/:org_key", post(store_backup))
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .with_state(state)
}

/// Full-replace store of the posted payload under `org_key`.
/// The only validation is presence of the `itens` field.
async fn store_backup(
    State(state): State<AppState>,
    Path(org_key): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    if payload.get("itens").is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Campo 'itens' obrigatório." })),
        )
            .into_response();
    }

    let item_count = payload["itens"].as_array().map(|a| a.len()).unwrap_or(0);
    state.store.write().await.insert(org_key.clone(), payload);
    tracing::info!(org = %org_key, items = item_count, "backup stored");

    Json(json!({ "ok": true })).into_response()
}

/// The stored payload verbatim, or 404 when the key has no backup.
async fn fetch_backup(State(state): State<AppState>, Path(org_key): Path<String>) -> Response {
    match state.store.read().await.get(&org_key) {
        Some(payload) => Json(payload.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Nenhum backup para essa empresa." })),
        )
            .into_response(),
    }
}

/// Allow-list CORS: allowed origins get every method and header;
/// anything else receives no CORS headers at all.
async fn cors_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let allowed = origin
        .as_deref()
        .map(|o| state.allowed_origins.iter().any(|x| x == o))
        .unwrap_or(false);

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if allowed {
            apply_cors_headers(&mut resp, origin.as_deref());
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if allowed {
        apply_cors_headers(&mut resp, origin.as_deref());
    }
    resp
}

fn apply_cors_headers(resp: &mut Response, origin: Option<&str>) {
    let Some(origin) = origin else { return };
    if let Ok(value) = HeaderValue::from_str(origin) {
        resp.headers_mut().insert("access-control-allow-origin", value);
    }
    resp.headers_mut().insert(
        "access-control-allow-methods",
        HeaderValue::from_static("*"),
    );
    resp.headers_mut().insert(
        "access-control-allow-headers",
        HeaderValue::from_static("*"),
    );
}
