//! Per-call option objects and the response result.
//!
//! # Design
//! Every field is optional. On `RequestOptions` a missing field means "use
//! the client default"; on `ExpectedResponse` it means "do not assert on
//! this aspect". Both deserialize from camelCase JSON objects so that
//! positional option objects (see [`crate::call`]) and fixtures share the
//! same shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::find_header;

/// Request body: a raw string written verbatim, or a structured value sent
/// as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    Text(String),
    Json(Value),
}

impl From<&str> for RequestBody {
    fn from(value: &str) -> Self {
        RequestBody::Text(value.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        RequestBody::Text(value)
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RequestBody::Text(s),
            other => RequestBody::Json(other),
        }
    }
}

/// Options that shape the outgoing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestOptions {
    /// Query parameters for methods that do not carry a body. POST and PUT
    /// send it as the body when `body` is absent.
    #[serde(alias = "data")]
    pub query_data: Option<Value>,
    pub body: Option<RequestBody>,
    /// Merged over the client's default headers; these win.
    pub headers: Option<IndexMap<String, String>>,
    /// Overrides the client credentials for this call only.
    pub credentials: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !matches!(self.query_data, Some(Value::Object(_))) {
            self.query_data = Some(Value::Object(Map::new()));
        }
        if let Some(Value::Object(map)) = &mut self.query_data {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }
}

/// Assertions to run against the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpectedResponse {
    pub status: Option<u16>,
    /// Merged over the client's expected headers; these win.
    pub headers: Option<IndexMap<String, String>>,
    /// Exact match against the accumulated body.
    pub body: Option<String>,
    /// Deep match against the decoded JSON body.
    pub data: Option<Value>,
}

impl ExpectedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The interpreted response handed to continuations and returned by every
/// call.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    pub status: u16,
    /// Header names are lowercase.
    pub headers: Vec<(String, String)>,
    pub raw_body: String,
    /// Decoded body, present only for JSON responses that could be decoded.
    pub parsed_data: Option<Value>,
}

impl ResponseResult {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}
