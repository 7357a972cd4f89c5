//! Client-level configuration.
//!
//! `ClientConfig` is built once and never mutated by a call. It can be read
//! from a camelCase JSON object, where every key is optional:
//!
//! ```json
//! { "host": "localhost", "port": 3600, "basePath": "/api", "status": 200 }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    80
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Prefix prepended to every route.
    #[serde(alias = "path")]
    pub base_path: String,
    /// Sent with every request, lowest priority.
    pub default_headers: IndexMap<String, String>,
    /// Asserted on every response unless a call overrides the key.
    #[serde(alias = "headers")]
    pub expected_headers: IndexMap<String, String>,
    /// Asserted on every response when a call does not name a status.
    #[serde(alias = "status")]
    pub default_status: Option<u16>,
    /// `user:pass`, used when a call does not override it.
    pub credentials: Option<String>,
    #[serde(alias = "useSecureTransport")]
    pub secure: bool,
    /// Log request and response descriptors.
    #[serde(alias = "debugLogging")]
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: String::new(),
            default_headers: IndexMap::new(),
            expected_headers: IndexMap::new(),
            default_status: None,
            credentials: None,
            secure: false,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_expected_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.expected_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_default_status(mut self, status: u16) -> Self {
        self.default_status = Some(status);
        self
    }

    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 80);
        assert_eq!(config.base_path, "");
        assert!(config.default_status.is_none());
    }

    #[test]
    fn camel_case_keys_are_read() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"port":3600,"basePath":"/api","status":200,
                "expectedHeaders":{"content-type":"application/json"}}"#,
        )
        .unwrap();
        assert_eq!(config.port, 3600);
        assert_eq!(config.base_path, "/api");
        assert_eq!(config.default_status, Some(200));
        assert_eq!(config.expected_headers["content-type"], "application/json");
    }

    #[test]
    fn short_aliases_are_read() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"path":"/v1","headers":{"x-served-by":"api"},
                "useSecureTransport":true,"debugLogging":true}"#,
        )
        .unwrap();
        assert_eq!(config.base_path, "/v1");
        assert_eq!(config.expected_headers["x-served-by"], "api");
        assert!(config.default_headers.is_empty());
        assert!(config.secure);
        assert!(config.debug);
    }

    #[test]
    fn builder_sets_fields() {
        let config = ClientConfig::new()
            .with_port(3600)
            .with_default_header("x-api-key", "secret")
            .with_credentials("user:pass")
            .with_debug(true);
        assert_eq!(config.port, 3600);
        assert_eq!(config.default_headers["x-api-key"], "secret");
        assert_eq!(config.credentials.as_deref(), Some("user:pass"));
        assert!(config.debug);
        assert!(!config.secure);
    }
}
