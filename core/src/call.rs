//! Normalizes the flexible call surface into one canonical shape.
//!
//! # Design
//! A call is `(ctx, route, args)` where `args` is anything convertible into
//! [`CallArgs`]. Each accepted shape has its own `From` impl:
//!
//! | supplied after the route                     | request | expected | continuation |
//! |----------------------------------------------|---------|----------|--------------|
//! | nothing `()`                                 | empty   | empty    | none         |
//! | `Continuation`                               | empty   | empty    | given        |
//! | `ExpectedResponse`                           | empty   | given    | none         |
//! | `(RequestOptions, Continuation)`             | given   | empty    | given        |
//! | `(RequestOptions, ExpectedResponse)`         | given   | given    | none         |
//! | `(RequestOptions, ExpectedResponse, Cont.)`  | given   | given    | given        |
//!
//! [`CallArgs::from_positional`] applies the same rules to an untyped list
//! (JSON option objects and continuations), deciding by arity first and then
//! by whether the last argument is a continuation. A `null` in the third
//! position means "no continuation". Anything outside those shapes is
//! rejected with [`Error::CallShape`].

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{ExpectedResponse, RequestOptions, ResponseResult};

/// Invoked with the interpreted response in place of the default completion
/// signal.
pub type Continuation<'a> = Box<dyn FnOnce(&ResponseResult) + Send + 'a>;

/// Box a closure as a [`Continuation`].
pub fn then<'a, F>(f: F) -> Continuation<'a>
where
    F: FnOnce(&ResponseResult) + Send + 'a,
{
    Box::new(f)
}

/// Canonical per-call arguments.
#[derive(Default)]
pub struct CallArgs<'a> {
    pub request: RequestOptions,
    pub expected: ExpectedResponse,
    pub continuation: Option<Continuation<'a>>,
}

impl fmt::Debug for CallArgs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("request", &self.request)
            .field("expected", &self.expected)
            .field("continuation", &self.continuation.is_some())
            .finish()
    }
}

/// One untyped positional argument.
pub enum Arg<'a> {
    Options(Value),
    Continuation(Continuation<'a>),
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Options(v) => f.debug_tuple("Options").field(v).finish(),
            Arg::Continuation(_) => f.write_str("Continuation"),
        }
    }
}

impl From<Value> for Arg<'_> {
    fn from(value: Value) -> Self {
        Arg::Options(value)
    }
}

impl<'a> From<Continuation<'a>> for Arg<'a> {
    fn from(continuation: Continuation<'a>) -> Self {
        Arg::Continuation(continuation)
    }
}

impl<'a> CallArgs<'a> {
    /// Resolve an untyped argument list (everything after the route).
    pub fn from_positional(args: Vec<Arg<'a>>) -> Result<Self> {
        let count = args.len();
        let shape: Vec<&str> = args
            .iter()
            .map(|arg| match arg {
                Arg::Options(_) => "options",
                Arg::Continuation(_) => "continuation",
            })
            .collect();
        let shape = format!("({})", shape.join(", "));
        let mut args = args.into_iter();
        match (args.next(), args.next(), args.next(), args.next()) {
            (None, _, _, _) => Ok(Self::default()),
            (Some(Arg::Continuation(cb)), None, _, _) => Ok(cb.into()),
            (Some(Arg::Options(res)), None, _, _) => Ok(options::<ExpectedResponse>(res)?.into()),
            (Some(Arg::Options(req)), Some(Arg::Continuation(cb)), None, _) => {
                Ok((options::<RequestOptions>(req)?, cb).into())
            }
            (Some(Arg::Options(req)), Some(Arg::Options(res)), None, _) => Ok((
                options::<RequestOptions>(req)?,
                options::<ExpectedResponse>(res)?,
            )
                .into()),
            (
                Some(Arg::Options(req)),
                Some(Arg::Options(res)),
                Some(Arg::Continuation(cb)),
                None,
            ) => Ok((
                options::<RequestOptions>(req)?,
                options::<ExpectedResponse>(res)?,
                cb,
            )
                .into()),
            (
                Some(Arg::Options(req)),
                Some(Arg::Options(res)),
                Some(Arg::Options(Value::Null)),
                None,
            ) => Ok((
                options::<RequestOptions>(req)?,
                options::<ExpectedResponse>(res)?,
            )
                .into()),
            _ if count > 3 => Err(Error::CallShape(format!(
                "expected at most 3 arguments after the route, got {count}"
            ))),
            _ => Err(Error::CallShape(format!(
                "unsupported argument shape {shape}; a continuation may only come last"
            ))),
        }
    }
}

/// `null` reads as an empty options object.
fn options<T: DeserializeOwned + Default>(value: Value) -> Result<T> {
    match value {
        Value::Null => Ok(T::default()),
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(Error::CallShape(format!(
            "options must be an object, got {other}"
        ))),
    }
}

impl From<()> for CallArgs<'_> {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<'a> From<Continuation<'a>> for CallArgs<'a> {
    fn from(continuation: Continuation<'a>) -> Self {
        Self {
            continuation: Some(continuation),
            ..Self::default()
        }
    }
}

impl From<ExpectedResponse> for CallArgs<'_> {
    fn from(expected: ExpectedResponse) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }
}

impl<'a> From<(RequestOptions, Continuation<'a>)> for CallArgs<'a> {
    fn from((request, continuation): (RequestOptions, Continuation<'a>)) -> Self {
        Self {
            request,
            continuation: Some(continuation),
            ..Self::default()
        }
    }
}

impl From<(RequestOptions, ExpectedResponse)> for CallArgs<'_> {
    fn from((request, expected): (RequestOptions, ExpectedResponse)) -> Self {
        Self {
            request,
            expected,
            continuation: None,
        }
    }
}

impl<'a> From<(RequestOptions, ExpectedResponse, Continuation<'a>)> for CallArgs<'a> {
    fn from(
        (request, expected, continuation): (RequestOptions, ExpectedResponse, Continuation<'a>),
    ) -> Self {
        Self {
            request,
            expected,
            continuation: Some(continuation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestBody;
    use serde_json::json;

    fn noop<'a>() -> Continuation<'a> {
        then(|_| {})
    }

    #[test]
    fn nothing_after_route_is_all_empty() {
        let args = CallArgs::from_positional(Vec::new()).unwrap();
        assert_eq!(args.request, RequestOptions::default());
        assert_eq!(args.expected, ExpectedResponse::default());
        assert!(args.continuation.is_none());
    }

    #[test]
    fn single_continuation() {
        let args = CallArgs::from_positional(vec![noop().into()]).unwrap();
        assert!(args.continuation.is_some());
        assert_eq!(args.request, RequestOptions::default());
        assert_eq!(args.expected, ExpectedResponse::default());
    }

    #[test]
    fn single_object_is_expected_response() {
        let args = CallArgs::from_positional(vec![json!({"status": 200}).into()]).unwrap();
        assert_eq!(args.expected.status, Some(200));
        assert_eq!(args.request, RequestOptions::default());
        assert!(args.continuation.is_none());
    }

    #[test]
    fn request_then_continuation() {
        let args =
            CallArgs::from_positional(vec![json!({"body": "test"}).into(), noop().into()]).unwrap();
        assert_eq!(args.request.body, Some(RequestBody::Text("test".to_string())));
        assert_eq!(args.expected, ExpectedResponse::default());
        assert!(args.continuation.is_some());
    }

    #[test]
    fn request_then_expected() {
        let args = CallArgs::from_positional(vec![
            json!({"headers": {"foo": "bar"}}).into(),
            json!({"body": "ok"}).into(),
        ])
        .unwrap();
        assert_eq!(args.request.headers.unwrap()["foo"], "bar");
        assert_eq!(args.expected.body.as_deref(), Some("ok"));
        assert!(args.continuation.is_none());
    }

    #[test]
    fn all_three_positional() {
        let args = CallArgs::from_positional(vec![
            json!({}).into(),
            json!({"status": 204}).into(),
            noop().into(),
        ])
        .unwrap();
        assert_eq!(args.expected.status, Some(204));
        assert!(args.continuation.is_some());
    }

    #[test]
    fn null_reads_as_empty_options() {
        let args =
            CallArgs::from_positional(vec![Value::Null.into(), Value::Null.into()]).unwrap();
        assert_eq!(args.request, RequestOptions::default());
        assert_eq!(args.expected, ExpectedResponse::default());
    }

    #[test]
    fn trailing_null_means_no_continuation() {
        let args = CallArgs::from_positional(vec![
            json!({"data": "test"}).into(),
            json!({"status": 200}).into(),
            Value::Null.into(),
        ])
        .unwrap();
        assert_eq!(args.request.query_data, Some(json!("test")));
        assert_eq!(args.expected.status, Some(200));
        assert!(args.continuation.is_none());
    }

    #[test]
    fn data_key_is_accepted_in_request_options() {
        let args = CallArgs::from_positional(vec![
            json!({"headers": {"color": "red"}, "data": "test"}).into(),
            json!({}).into(),
        ])
        .unwrap();
        assert_eq!(args.request.query_data, Some(json!("test")));
        assert_eq!(args.request.headers.unwrap()["color"], "red");
    }

    #[test]
    fn continuation_before_options_is_rejected() {
        let err = CallArgs::from_positional(vec![noop().into(), json!({}).into()]).unwrap_err();
        assert!(matches!(err, Error::CallShape(_)));
    }

    #[test]
    fn three_args_without_trailing_continuation_is_rejected() {
        let err = CallArgs::from_positional(vec![
            json!({}).into(),
            json!({}).into(),
            json!({}).into(),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::CallShape(_)));
    }

    #[test]
    fn too_many_args_is_rejected() {
        let err = CallArgs::from_positional(vec![
            json!({}).into(),
            json!({}).into(),
            noop().into(),
            noop().into(),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::CallShape(msg) if msg.contains("4")));
    }

    #[test]
    fn non_object_options_are_rejected() {
        let err = CallArgs::from_positional(vec![json!("status").into()]).unwrap_err();
        assert!(matches!(err, Error::CallShape(_)));
    }

    #[test]
    fn unknown_option_key_is_an_options_error() {
        let err = CallArgs::from_positional(vec![json!({"stauts": 200}).into()]).unwrap_err();
        assert!(matches!(err, Error::InvalidOptions(_)));
    }

    #[test]
    fn typed_shapes_convert() {
        let args: CallArgs = ().into();
        assert!(args.continuation.is_none());

        let args: CallArgs = ExpectedResponse::new().status(200).into();
        assert_eq!(args.expected.status, Some(200));

        let args: CallArgs = (RequestOptions::new().body("x"), noop()).into();
        assert!(args.continuation.is_some());
        assert_eq!(args.expected, ExpectedResponse::default());

        let args: CallArgs = (RequestOptions::new(), ExpectedResponse::new().body("y")).into();
        assert!(args.continuation.is_none());
        assert_eq!(args.expected.body.as_deref(), Some("y"));

        let args: CallArgs = (RequestOptions::new(), ExpectedResponse::new(), noop()).into();
        assert!(args.continuation.is_some());
    }
}
