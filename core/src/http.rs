//! Wire-level request and response descriptions.
//!
//! # Design
//! These types describe an HTTP exchange as plain data. The client builds an
//! `HttpRequest` from its configuration and the per-call options, hands it to
//! a [`Transport`](crate::transport::Transport), and gets back an
//! `HttpResponse` whose body is still the list of chunks the transport
//! delivered. Interpretation of that body happens in [`crate::interpret`].
//!
//! All fields use owned types (`String`, `Vec`) so values can move onto a
//! blocking worker without lifetime concerns.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Head,
    Put,
    Delete,
    Trace,
    Options,
    Connect,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Head,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Trace,
        HttpMethod::Options,
        HttpMethod::Connect,
    ];

    /// Method name as written on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Head => "HEAD",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Connect => "CONNECT",
        }
    }

    /// Only POST and PUT write a request body. Every other method sends its
    /// `queryData` in the query string instead.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub host: String,
    pub port: u16,
    pub secure: bool,
    /// Base path, route and query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    /// `user:pass`, sent as basic authentication by the transport.
    pub credentials: Option<String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}:{}{}", self.host, self.port, self.path)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response as delivered by the transport, before interpretation.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Body chunks in arrival order.
    pub chunks: Vec<Vec<u8>>,
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Insert or replace `name`, matching existing keys case-insensitively.
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
