//! The respond seam: turning a typed value or a status error into a response

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use myelin_core::{BoxError, RequestContext, StatusError};
use serde::Serialize;

/// Self-rendering capability for response types
///
/// The provided method is the default encoder (200 with the JSON encoding of
/// the value), so most types opt in with an empty impl. A type that needs
/// another status code, extra headers, or a different wire format overrides
/// [`Reply::render`]:
///
/// ```
/// use axum::body::Body;
/// use axum::response::Response;
/// use myelin::{BoxError, Reply, RequestContext};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct OrderPlaced {
///     id: u64,
/// }
///
/// impl Reply for OrderPlaced {
///     fn render(&self, _cx: &RequestContext) -> Result<Response, BoxError> {
///         let response = Response::builder()
///             .status(http::StatusCode::CREATED)
///             .header(http::header::LOCATION, format!("/orders/{}", self.id))
///             .header(http::header::CONTENT_TYPE, "application/json")
///             .body(Body::from(serde_json::to_vec(self)?))?;
///         Ok(response)
///     }
/// }
/// ```
///
/// A failure returned from `render` is routed to the pipeline's error
/// handler: nothing has been written to the wire at that point, so the
/// request still gets exactly one (error) response, and the failure is
/// logged. A panic inside an override is not caught anywhere in the
/// pipeline.
pub trait Reply: Serialize {
    /// Render this value onto an HTTP response
    fn render(&self, _cx: &RequestContext) -> Result<Response, BoxError> {
        encode(self)
    }
}

/// Default encoder: 200 OK with the JSON serialization of `value`
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Response, BoxError> {
    let body = serde_json::to_vec(value)?;
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))?;
    Ok(response)
}

/// Render a status error as plain text
///
/// Status line = the code, body = the canonical reason phrase. The internal
/// cause never reaches the wire; it belongs to the log record.
pub fn plain_text(status: &StatusError) -> Response {
    (status.code(), status.reason()).into_response()
}
