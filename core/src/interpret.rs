//! Turns a transport response into a [`ResponseResult`].
//!
//! The body chunks are concatenated in order and read as UTF-8. When the
//! response declares a JSON content type and the body is not empty, the
//! body is decoded with [`lenient_json`].

use serde_json::Value;

use crate::http::{find_header, HttpResponse};
use crate::types::ResponseResult;

/// Decode `body` as JSON, falling back once to the text starting at the
/// first `{`.
///
/// The fallback covers error pages or stray bytes in front of a JSON
/// document. It is a single retry from the first brace, even when that brace
/// sits inside unrelated text. When both attempts fail the failure is logged
/// and `None` is returned.
pub fn lenient_json(body: &str) -> Option<Value> {
    let first = match serde_json::from_str(body) {
        Ok(value) => return Some(value),
        Err(err) => err,
    };
    let retry = match body.find('{') {
        Some(start) => serde_json::from_str(&body[start..]),
        None => {
            tracing::warn!(error = %first, "response body is not JSON and holds no object");
            return None;
        }
    };
    match retry {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                error = %first,
                retry_error = %err,
                "could not recover JSON from response body"
            );
            None
        }
    }
}

fn is_json(content_type: &str) -> bool {
    content_type.contains("application/json")
}

/// Accumulate the body and decode JSON where the content type asks for it.
pub fn interpret(response: HttpResponse) -> ResponseResult {
    let bytes: Vec<u8> = response.chunks.concat();
    let raw_body = String::from_utf8_lossy(&bytes).into_owned();

    let headers: Vec<(String, String)> = response
        .headers
        .into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect();

    let parsed_data = match find_header(&headers, "content-type") {
        Some(ct) if is_json(ct) && !raw_body.is_empty() => lenient_json(&raw_body),
        _ => None,
    };

    ResponseResult {
        status: response.status,
        headers,
        raw_body,
        parsed_data,
    }
}
