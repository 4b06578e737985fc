use std::error::Error as StdError;

use http::StatusCode;
use thiserror::Error;

/// Type-erased error moved through the dispatch pipeline.
///
/// Anything a business handler can fail with converts into this: `thiserror`
/// enums, `anyhow::Error`, plain strings, and [`StatusError`] itself.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// An error tagged with an HTTP status code and an optional internal cause.
///
/// The `Display` text is always the canonical reason phrase for the code
/// ("Not Found", "Conflict", ...), independent of any attached cause, so it
/// is always safe to show to a client. The cause is carried for diagnostics
/// only and surfaces through [`std::error::Error::source`]; it is never part
/// of the client-visible text.
///
/// The associated constants below cover the registered 4xx/5xx codes and are
/// the values the rest of the system is expected to construct directly:
///
/// ```
/// use myelin_core::StatusError;
///
/// let err = StatusError::CONFLICT.with_internal("duplicate key: todo#42");
/// assert_eq!(err.code().as_u16(), 409);
/// assert_eq!(err.to_string(), "Conflict");
/// ```
#[derive(Debug, Error)]
#[error("{}", .code.canonical_reason().unwrap_or(""))]
pub struct StatusError {
    code: StatusCode,
    #[source]
    internal: Option<BoxError>,
}

impl StatusError {
    /// Create an error for `code` with no cause attached.
    ///
    /// Codes the `http` crate has no reason phrase for display as the empty
    /// string.
    pub const fn new(code: StatusCode) -> Self {
        Self { code, internal: None }
    }

    /// The HTTP status code.
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Canonical reason phrase for the code, or `""` when it has none.
    pub fn reason(&self) -> &'static str {
        self.code.canonical_reason().unwrap_or("")
    }

    /// The wrapped cause, when one was attached.
    ///
    /// Same view as [`std::error::Error::source`], reachable without
    /// importing the trait.
    pub fn internal(&self) -> Option<&(dyn StdError + 'static)> {
        StdError::source(self)
    }

    /// The cause chain rendered root-to-leaf (`"saving order: duplicate
    /// key"`), or `None` when no cause is attached.
    ///
    /// This is the `internal` field of the log record emitted for a failed
    /// request; it never appears in the client-visible response.
    pub fn internal_chain(&self) -> Option<String> {
        self.internal.as_deref().map(|internal| {
            let mut rendered = internal.to_string();
            let mut source = internal.source();
            while let Some(cause) = source {
                rendered.push_str(": ");
                rendered.push_str(&cause.to_string());
                source = cause.source();
            }
            rendered
        })
    }

    /// Attach an internal cause, returning the new value.
    ///
    /// The constants below are materialized per use site, so this never
    /// alters the catalog:
    ///
    /// ```
    /// use myelin_core::StatusError;
    ///
    /// let gone = StatusError::GONE.with_internal("purged 2024-11-02");
    /// assert_eq!(gone.to_string(), StatusError::GONE.to_string());
    /// ```
    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<BoxError>) -> Self {
        self.internal = Some(internal.into());
        self
    }

    /// Resolve an erased error to a `StatusError`.
    ///
    /// If `err` is one, it is used verbatim. If it wraps one anywhere in its
    /// `source()` chain, the wrapped code is kept and the whole original
    /// error becomes the cause. Anything else resolves to 500 Internal
    /// Server Error, again with the original error as cause, so detail is
    /// hidden from the client but never discarded.
    pub fn resolve(err: BoxError) -> Self {
        match err.downcast::<Self>() {
            Ok(status) => *status,
            Err(err) => match find_code(err.as_ref()) {
                Some(code) => Self::new(code).with_internal(err),
                None => Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_internal(err),
            },
        }
    }
}

/// Walk the cause chain looking for a nested `StatusError`.
fn find_code(err: &(dyn StdError + 'static)) -> Option<StatusCode> {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(err) = current {
        if let Some(status) = err.downcast_ref::<StatusError>() {
            return Some(status.code);
        }
        current = err.source();
    }
    None
}

/// The registered 4xx and 5xx status codes, each tagged with its defining
/// RFC.
impl StatusError {
    /// 400 Bad Request (RFC 9110, 15.5.1)
    pub const BAD_REQUEST: Self = Self::new(StatusCode::BAD_REQUEST);
    /// 401 Unauthorized (RFC 9110, 15.5.2)
    pub const UNAUTHORIZED: Self = Self::new(StatusCode::UNAUTHORIZED);
    /// 402 Payment Required (RFC 9110, 15.5.3)
    pub const PAYMENT_REQUIRED: Self = Self::new(StatusCode::PAYMENT_REQUIRED);
    /// 403 Forbidden (RFC 9110, 15.5.4)
    pub const FORBIDDEN: Self = Self::new(StatusCode::FORBIDDEN);
    /// 404 Not Found (RFC 9110, 15.5.5)
    pub const NOT_FOUND: Self = Self::new(StatusCode::NOT_FOUND);
    /// 405 Method Not Allowed (RFC 9110, 15.5.6)
    pub const METHOD_NOT_ALLOWED: Self = Self::new(StatusCode::METHOD_NOT_ALLOWED);
    /// 406 Not Acceptable (RFC 9110, 15.5.7)
    pub const NOT_ACCEPTABLE: Self = Self::new(StatusCode::NOT_ACCEPTABLE);
    /// 407 Proxy Authentication Required (RFC 9110, 15.5.8)
    pub const PROXY_AUTHENTICATION_REQUIRED: Self = Self::new(StatusCode::PROXY_AUTHENTICATION_REQUIRED);
    /// 408 Request Timeout (RFC 9110, 15.5.9)
    pub const REQUEST_TIMEOUT: Self = Self::new(StatusCode::REQUEST_TIMEOUT);
    /// 409 Conflict (RFC 9110, 15.5.10)
    pub const CONFLICT: Self = Self::new(StatusCode::CONFLICT);
    /// 410 Gone (RFC 9110, 15.5.11)
    pub const GONE: Self = Self::new(StatusCode::GONE);
    /// 411 Length Required (RFC 9110, 15.5.12)
    pub const LENGTH_REQUIRED: Self = Self::new(StatusCode::LENGTH_REQUIRED);
    /// 412 Precondition Failed (RFC 9110, 15.5.13)
    pub const PRECONDITION_FAILED: Self = Self::new(StatusCode::PRECONDITION_FAILED);
    /// 413 Payload Too Large (RFC 9110, 15.5.14)
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(StatusCode::PAYLOAD_TOO_LARGE);
    /// 414 URI Too Long (RFC 9110, 15.5.15)
    pub const URI_TOO_LONG: Self = Self::new(StatusCode::URI_TOO_LONG);
    /// 415 Unsupported Media Type (RFC 9110, 15.5.16)
    pub const UNSUPPORTED_MEDIA_TYPE: Self = Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    /// 416 Range Not Satisfiable (RFC 9110, 15.5.17)
    pub const RANGE_NOT_SATISFIABLE: Self = Self::new(StatusCode::RANGE_NOT_SATISFIABLE);
    /// 417 Expectation Failed (RFC 9110, 15.5.18)
    pub const EXPECTATION_FAILED: Self = Self::new(StatusCode::EXPECTATION_FAILED);
    /// 418 I'm a teapot (RFC 9110, 15.5.19, unused)
    pub const IM_A_TEAPOT: Self = Self::new(StatusCode::IM_A_TEAPOT);
    /// 421 Misdirected Request (RFC 9110, 15.5.20)
    pub const MISDIRECTED_REQUEST: Self = Self::new(StatusCode::MISDIRECTED_REQUEST);
    /// 422 Unprocessable Entity (RFC 9110, 15.5.21)
    pub const UNPROCESSABLE_ENTITY: Self = Self::new(StatusCode::UNPROCESSABLE_ENTITY);
    /// 423 Locked (RFC 4918, 11.3)
    pub const LOCKED: Self = Self::new(StatusCode::LOCKED);
    /// 424 Failed Dependency (RFC 4918, 11.4)
    pub const FAILED_DEPENDENCY: Self = Self::new(StatusCode::FAILED_DEPENDENCY);
    /// 425 Too Early (RFC 8470, 5.2)
    pub const TOO_EARLY: Self = Self::new(StatusCode::TOO_EARLY);
    /// 426 Upgrade Required (RFC 9110, 15.5.22)
    pub const UPGRADE_REQUIRED: Self = Self::new(StatusCode::UPGRADE_REQUIRED);
    /// 428 Precondition Required (RFC 6585, 3)
    pub const PRECONDITION_REQUIRED: Self = Self::new(StatusCode::PRECONDITION_REQUIRED);
    /// 429 Too Many Requests (RFC 6585, 4)
    pub const TOO_MANY_REQUESTS: Self = Self::new(StatusCode::TOO_MANY_REQUESTS);
    /// 431 Request Header Fields Too Large (RFC 6585, 5)
    pub const REQUEST_HEADER_FIELDS_TOO_LARGE: Self = Self::new(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
    /// 451 Unavailable For Legal Reasons (RFC 7725, 3)
    pub const UNAVAILABLE_FOR_LEGAL_REASONS: Self = Self::new(StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS);
    /// 500 Internal Server Error (RFC 9110, 15.6.1)
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(StatusCode::INTERNAL_SERVER_ERROR);
    /// 501 Not Implemented (RFC 9110, 15.6.2)
    pub const NOT_IMPLEMENTED: Self = Self::new(StatusCode::NOT_IMPLEMENTED);
    /// 502 Bad Gateway (RFC 9110, 15.6.3)
    pub const BAD_GATEWAY: Self = Self::new(StatusCode::BAD_GATEWAY);
    /// 503 Service Unavailable (RFC 9110, 15.6.4)
    pub const SERVICE_UNAVAILABLE: Self = Self::new(StatusCode::SERVICE_UNAVAILABLE);
    /// 504 Gateway Timeout (RFC 9110, 15.6.5)
    pub const GATEWAY_TIMEOUT: Self = Self::new(StatusCode::GATEWAY_TIMEOUT);
    /// 505 HTTP Version Not Supported (RFC 9110, 15.6.6)
    pub const HTTP_VERSION_NOT_SUPPORTED: Self = Self::new(StatusCode::HTTP_VERSION_NOT_SUPPORTED);
    /// 506 Variant Also Negotiates (RFC 2295, 8.1)
    pub const VARIANT_ALSO_NEGOTIATES: Self = Self::new(StatusCode::VARIANT_ALSO_NEGOTIATES);
    /// 507 Insufficient Storage (RFC 4918, 11.5)
    pub const INSUFFICIENT_STORAGE: Self = Self::new(StatusCode::INSUFFICIENT_STORAGE);
    /// 508 Loop Detected (RFC 5842, 7.2)
    pub const LOOP_DETECTED: Self = Self::new(StatusCode::LOOP_DETECTED);
    /// 510 Not Extended (RFC 2774, 7)
    pub const NOT_EXTENDED: Self = Self::new(StatusCode::NOT_EXTENDED);
    /// 511 Network Authentication Required (RFC 6585, 6)
    pub const NETWORK_AUTHENTICATION_REQUIRED: Self = Self::new(StatusCode::NETWORK_AUTHENTICATION_REQUIRED);
}
