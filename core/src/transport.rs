//! The send-and-receive primitive behind the client.
//!
//! # Design
//! `Transport` is the only place that touches the network. The default
//! `UreqTransport` runs a blocking `ureq` agent on tokio's blocking pool so
//! each call stays a plain future. Status codes are never errors here: a
//! 500 is a response like any other and goes to the assertion phase.

use std::io::Read;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

const CHUNK_SIZE: usize = 8 * 1024;

/// HTTP/HTTPS transport backed by `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn execute(agent: &ureq::Agent, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = ureq::http::Request::builder()
            .method(req.method.as_str())
            .uri(req.url());
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &req.credentials {
            builder = builder.header(
                "authorization",
                format!("Basic {}", STANDARD.encode(credentials)),
            );
        }

        let invalid = |e: ureq::http::Error| TransportError::InvalidRequest(e.to_string());
        let result = match &req.body {
            Some(body) => agent.run(builder.body(body.clone()).map_err(invalid)?),
            None => agent.run(builder.body(()).map_err(invalid)?),
        };
        let response = result.map_err(|e| TransportError::Io(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let mut reader = response.into_body().into_reader();
        let mut chunks = Vec::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|e| TransportError::Io(e.to_string()))?;
            if n == 0 {
                break;
            }
            chunks.push(buf[..n].to_vec());
        }

        Ok(HttpResponse {
            status,
            headers,
            chunks,
        })
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || Self::execute(&agent, &request))
            .await
            .map_err(|e| TransportError::Join(e.to_string()))?
    }
}
