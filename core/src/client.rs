//! Request building, dispatch and the per-call pipeline.
//!
//! # Design
//! `Client` holds an immutable `ClientConfig` and a transport; it carries no
//! mutable state between calls. A call runs three steps in order:
//! `build_request` merges client defaults with the per-call options into an
//! `HttpRequest`, the transport sends it, and the response is interpreted and
//! checked before the continuation (or the context's `done`) runs.
//! `build_request` is pure so the merge rules can be tested without a
//! network.

use serde_json::{Map, Value};

use crate::assert::{check_response, Assertions};
use crate::call::CallArgs;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{find_header, set_header, HttpMethod, HttpRequest};
use crate::interpret::interpret;
use crate::transport::{Transport, UreqTransport};
use crate::types::{RequestBody, RequestOptions, ResponseResult};

/// Build a client that talks HTTP through `ureq`.
pub fn create(config: ClientConfig) -> Client<UreqTransport> {
    Client::with_transport(config, UreqTransport::new())
}

/// Request/response logging, switched on by `ClientConfig::debug`.
#[derive(Debug, Clone, Copy)]
struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    fn request(&self, req: &HttpRequest) {
        if self.enabled {
            tracing::info!(
                method = %req.method,
                url = %req.url(),
                headers = ?req.headers,
                body = ?req.body,
                "sending request"
            );
        }
    }

    fn response(&self, req: &HttpRequest, res: &ResponseResult) {
        if self.enabled {
            tracing::info!(
                method = %req.method,
                url = %req.url(),
                status = res.status,
                headers = ?res.headers,
                body = %res.raw_body,
                "received response"
            );
        }
    }
}

/// Assertion-aware HTTP client.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
    diagnostics: Diagnostics,
}

macro_rules! method_calls {
    ($($(#[$doc:meta])* $name:ident => $method:expr;)*) => {
        $(
            $(#[$doc])*
            pub async fn $name<'a>(
                &self,
                ctx: Option<&dyn Assertions>,
                route: &str,
                args: impl Into<CallArgs<'a>>,
            ) -> Result<ResponseResult> {
                self.request($method, ctx, route, args).await
            }
        )*
    };
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let diagnostics = Diagnostics {
            enabled: config.debug,
        };
        Self {
            config,
            transport,
            diagnostics,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Merge client defaults with `opts` into the wire request for `route`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        route: &str,
        opts: &RequestOptions,
    ) -> Result<HttpRequest> {
        let mut path = format!("{}{}", self.config.base_path, route);

        let mut headers: Vec<(String, String)> = Vec::new();
        for (name, value) in &self.config.default_headers {
            set_header(&mut headers, name, value);
        }
        if let Some(overrides) = &opts.headers {
            for (name, value) in overrides {
                set_header(&mut headers, name, value);
            }
        }

        let mut body = None;
        if method.carries_body() {
            let payload = match (&opts.body, &opts.query_data) {
                (Some(body), _) => Some(body.clone()),
                (None, Some(data)) if !data.is_null() => Some(RequestBody::from(data.clone())),
                (None, _) => None,
            };
            match payload {
                Some(RequestBody::Text(text)) => body = Some(text),
                Some(RequestBody::Json(value)) => {
                    if find_header(&headers, "content-type").is_none() {
                        set_header(&mut headers, "content-type", "application/json");
                    }
                    body = Some(
                        serde_json::to_string(&value)
                            .map_err(|e| Error::Serialization(e.to_string()))?,
                    );
                }
                None => {}
            }
        } else if let Some(Value::Object(data)) = &opts.query_data {
            let query = encode_query(data)?;
            if !query.is_empty() {
                path.push('?');
                path.push_str(&query);
            }
        }

        Ok(HttpRequest {
            method,
            host: self.config.host.clone(),
            port: self.config.port,
            secure: self.config.secure,
            path,
            headers,
            credentials: opts
                .credentials
                .clone()
                .or_else(|| self.config.credentials.clone()),
            body,
        })
    }

    /// Send one request and run the configured checks.
    ///
    /// `ctx = None` skips every check. Transport failures are returned as
    /// errors before any check or continuation runs.
    pub async fn request<'a>(
        &self,
        method: HttpMethod,
        ctx: Option<&dyn Assertions>,
        route: &str,
        args: impl Into<CallArgs<'a>>,
    ) -> Result<ResponseResult> {
        let CallArgs {
            request,
            expected,
            continuation,
        } = args.into();

        let wire = self.build_request(method, route, &request)?;
        self.diagnostics.request(&wire);

        let response = interpret(self.transport.send(&wire).await?);
        self.diagnostics.response(&wire, &response);

        if let Some(ctx) = ctx {
            check_response(ctx, &self.config, &expected, &response);
        }

        match continuation {
            Some(continuation) => continuation(&response),
            None => signal_done(ctx),
        }
        Ok(response)
    }

    method_calls! {
        get => HttpMethod::Get;
        post => HttpMethod::Post;
        head => HttpMethod::Head;
        put => HttpMethod::Put;
        delete => HttpMethod::Delete;
        trace => HttpMethod::Trace;
        options => HttpMethod::Options;
        connect => HttpMethod::Connect;
    }
}

/// Completion used when a call has no continuation.
fn signal_done(ctx: Option<&dyn Assertions>) {
    if let Some(ctx) = ctx {
        ctx.done();
    }
}

/// Encode query data in key order. Arrays repeat the key; objects and
/// `null` encode as empty values.
fn encode_query(data: &Map<String, Value>) -> Result<String> {
    fn scalar(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
        }
    }

    let mut pairs: Vec<(&str, String)> = Vec::new();
    for (key, value) in data {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.as_str(), scalar(item))));
            }
            other => pairs.push((key.as_str(), scalar(other))),
        }
    }
    serde_urlencoded::to_string(&pairs).map_err(|e| Error::Serialization(e.to_string()))
}
