//! The decode seam: turning an inbound body into a typed request value

use bytes::Bytes;
use myelin_core::{RequestContext, StatusError};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

/// Self-decoding capability for request types
///
/// Every request type the pipeline dispatches implements this. The provided
/// method is the default content-type-driven decoder, so most types opt in
/// with an empty impl:
///
/// ```
/// use myelin::Bind;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateOrder {
///     sku: String,
///     quantity: u32,
/// }
///
/// impl Bind for CreateOrder {}
/// ```
///
/// A type that needs custom parsing overrides [`Bind::bind`] and takes over
/// the whole step; the pipeline never falls back to the default for it.
pub trait Bind: DeserializeOwned {
    /// Decode an inbound request body into this type
    fn bind(cx: &RequestContext, body: &Bytes) -> Result<Self, StatusError> {
        decode(cx, body)
    }
}

/// Default decoder: JSON, selected by the request's `Content-Type`
///
/// Accepts `application/json` and any `+json` structured suffix, with or
/// without parameters. Anything else (including a missing header) is a
/// 415; an empty body is malformed JSON, not a skipped step.
pub fn decode<T: DeserializeOwned>(cx: &RequestContext, body: &Bytes) -> Result<T, StatusError> {
    let content_type = cx.content_type().unwrap_or("");
    if !is_json(content_type) {
        return Err(StatusError::UNSUPPORTED_MEDIA_TYPE.with_internal(format!(
            "unsupported content type {content_type:?}, expected application/json"
        )));
    }

    serde_json::from_slice(body).map_err(|err| {
        // Malformed or truncated JSON is a framing problem (400); well-formed
        // JSON of the wrong shape is a semantic rejection (422).
        let status = if matches!(err.classify(), Category::Data) {
            StatusError::UNPROCESSABLE_ENTITY
        } else {
            StatusError::BAD_REQUEST
        };
        status.with_internal(err)
    })
}

/// `application/json`, or any type with a `+json` structured suffix
fn is_json(content_type: &str) -> bool {
    let essence = content_type.split_once(';').map_or(content_type, |(essence, _)| essence).trim();
    essence.eq_ignore_ascii_case("application/json")
        || essence
            .rsplit_once('+')
            .is_some_and(|(_, suffix)| suffix.eq_ignore_ascii_case("json"))
}
