use http::request::Parts;

/// Per-request context handed to every stage of the dispatch pipeline
///
/// Carries the request head (method, URI, headers, extensions) so decoding,
/// validation, and business handlers can inspect it without owning the body;
/// the body is consumed separately by the decode stage.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP request parts (method, URI, headers, extensions)
    pub parts: Parts,
}

impl RequestContext {
    /// Wrap the head of an inbound request
    pub fn new(parts: Parts) -> Self {
        Self { parts }
    }

    /// Create a minimal context for tests and non-HTTP use
    ///
    /// A GET of `/` with no headers
    pub fn empty() -> Self {
        let (parts, ()) = http::Request::new(()).into_parts();
        Self::new(parts)
    }

    /// Request method
    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    /// Request URI
    pub fn uri(&self) -> &http::Uri {
        &self.parts.uri
    }

    /// Request path
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Access request headers
    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Values inserted by surrounding middleware (identity, trace IDs, ...)
    ///
    /// The pipeline carries them through untouched; interpreting them is the
    /// business handler's concern.
    pub fn extensions(&self) -> &http::Extensions {
        &self.parts.extensions
    }

    /// The `Content-Type` header, when present and readable as UTF-8
    pub fn content_type(&self) -> Option<&str> {
        self.parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}
