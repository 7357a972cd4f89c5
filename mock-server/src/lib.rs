//! Fixture HTTP server for exercising the assertion client.
//!
//! Routes:
//! - `GET /user` answers `{"name":"Charlie"}` as JSON.
//! - `/echo` and `/echo/*` answer, for any method, a JSON description of the
//!   request they received.
//! - `/empty` answers `204 No Content`.
//! - `/garbled` answers a JSON content type with HTML in front of the JSON.
//! - `/broken` answers a JSON content type with no JSON at all.
//! - `/text` answers `ok` as plain text.
//! - anything else answers `{}` as JSON.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::OriginalUri,
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What `/echo` saw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub const GARBLED_BODY: &str = r#"<html>error</html>{"ok":true}"#;
pub const BROKEN_BODY: &str = "<html>error</html>";

pub fn app() -> Router {
    Router::new()
        .route("/user", get(user))
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/empty", any(empty))
        .route("/garbled", get(garbled))
        .route("/broken", get(broken))
        .route("/text", get(text))
        .fallback(fallback)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn user() -> Json<Value> {
    Json(json!({ "name": "Charlie" }))
}

async fn echo(
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    tracing::debug!(%method, %uri, "echo");
    Json(Echo {
        method: method.to_string(),
        uri: uri.to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn garbled() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], GARBLED_BODY)
}

async fn broken() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], BROKEN_BODY)
}

async fn text() -> &'static str {
    "ok"
}

async fn fallback() -> Json<Value> {
    Json(json!({}))
}
