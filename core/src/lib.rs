//! HTTP client for test suites that checks responses as it goes.
//!
//! # Overview
//! Each call sends one request built from the client configuration plus
//! per-call options, reads the whole response, decodes JSON bodies (with a
//! lenient fallback for error pages in front of the JSON), runs the
//! configured checks through a caller-supplied [`Assertions`] value and then
//! hands the response to a continuation.
//!
//! ```no_run
//! # async fn demo() -> Result<(), http_assert::Error> {
//! use http_assert::{create, ClientConfig, ExpectedResponse, Strict};
//!
//! let api = create(ClientConfig::new().with_port(3600));
//! let res = api.get(Some(&Strict), "/user", ExpectedResponse::new().status(200)).await?;
//! assert_eq!(res.parsed_data.unwrap()["name"], "Charlie");
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - `Client` is stateless apart from its read-only `ClientConfig`.
//! - The network sits behind the [`Transport`] trait; [`UreqTransport`] is
//!   the default.
//! - The call surface accepts several argument shapes; [`call`] documents
//!   how each one maps to request options, expected response and
//!   continuation.

pub mod assert;
pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interpret;
pub mod transport;
pub mod types;

pub use assert::{Assertions, Evaluation, Recorder, Strict};
pub use call::{then, Arg, CallArgs, Continuation};
pub use client::{create, Client};
pub use config::ClientConfig;
pub use error::{Error, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interpret::lenient_json;
pub use transport::{Transport, UreqTransport};
pub use types::{ExpectedResponse, RequestBody, RequestOptions, ResponseResult};
