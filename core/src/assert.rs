//! Assertion context and the response assertion battery.
//!
//! # Design
//! The client never decides how a failed check is reported. It hands every
//! configured check to an [`Assertions`] value, which may panic, record, or
//! forward to another test framework. Every configured check runs; a
//! recording context therefore sees every mismatch in one call, while a
//! panicking one stops at the first.

use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::types::{ExpectedResponse, ResponseResult};

/// Receives checks from the client.
pub trait Assertions: Send + Sync {
    fn equal(&self, actual: &Value, expected: &Value, message: &str);

    fn deep_equal(&self, actual: &Value, expected: &Value, message: &str);

    /// Called when a call completes without a continuation.
    fn done(&self) {}
}

/// Panics with a diff on the first mismatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct Strict;

impl Assertions for Strict {
    fn equal(&self, actual: &Value, expected: &Value, message: &str) {
        pretty_assertions::assert_eq!(actual, expected, "{}", message);
    }

    fn deep_equal(&self, actual: &Value, expected: &Value, message: &str) {
        pretty_assertions::assert_eq!(actual, expected, "{}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Equal,
    DeepEqual,
}

/// One check as seen by a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub kind: CheckKind,
    pub message: String,
    pub actual: Value,
    pub expected: Value,
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        self.actual == self.expected
    }
}

/// Records every check and completion signal without failing.
#[derive(Debug, Default)]
pub struct Recorder {
    evaluations: Mutex<Vec<Evaluation>>,
    done: AtomicUsize,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluations(&self) -> Vec<Evaluation> {
        self.evaluations.lock().clone()
    }

    pub fn failures(&self) -> Vec<Evaluation> {
        self.evaluations
            .lock()
            .iter()
            .filter(|e| !e.passed())
            .cloned()
            .collect()
    }

    pub fn done_count(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }

    fn record(&self, kind: CheckKind, actual: &Value, expected: &Value, message: &str) {
        self.evaluations.lock().push(Evaluation {
            kind,
            message: message.to_string(),
            actual: actual.clone(),
            expected: expected.clone(),
        });
    }
}

impl Assertions for Recorder {
    fn equal(&self, actual: &Value, expected: &Value, message: &str) {
        self.record(CheckKind::Equal, actual, expected, message);
    }

    fn deep_equal(&self, actual: &Value, expected: &Value, message: &str) {
        self.record(CheckKind::DeepEqual, actual, expected, message);
    }

    fn done(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }
}

/// Run the configured checks against `response`.
///
/// Status falls back to the client default. Expected headers are the client
/// set overlaid with the per-call set; names are matched case-insensitively
/// and a missing header is compared as `null`.
pub fn check_response(
    ctx: &dyn Assertions,
    config: &ClientConfig,
    expected: &ExpectedResponse,
    response: &ResponseResult,
) {
    if let Some(status) = expected.status.or(config.default_status) {
        ctx.equal(&Value::from(response.status), &Value::from(status), "status");
    }

    let mut headers: IndexMap<String, String> = config
        .expected_headers
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
        .collect();
    if let Some(overrides) = &expected.headers {
        for (k, v) in overrides {
            headers.insert(k.to_ascii_lowercase(), v.clone());
        }
    }
    for (name, value) in &headers {
        let actual = response
            .header(name)
            .map_or(Value::Null, |v| Value::String(v.to_string()));
        ctx.equal(&actual, &Value::String(value.clone()), &format!("header {name}"));
    }

    if let Some(body) = &expected.body {
        ctx.equal(
            &Value::String(response.raw_body.clone()),
            &Value::String(body.clone()),
            "body",
        );
    }

    if let Some(data) = &expected.data {
        let actual = response.parsed_data.clone().unwrap_or(Value::Null);
        ctx.deep_equal(&actual, data, "data");
    }
}
