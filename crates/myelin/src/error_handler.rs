//! The error-handling strategy: one log record, one safe response

use axum::response::Response;
use myelin_core::{BoxError, RequestContext, StatusError};

use crate::response;

/// The swappable error-handling strategy
///
/// Every error that reaches the respond seam lands here: decode and
/// validation failures, business errors, and render failures alike. Replace
/// it through [`PipelineBuilder::error_handler`](crate::PipelineBuilder::error_handler)
/// to change the log format, emit error telemetry, or render richer error
/// bodies; the dispatch pipeline itself stays untouched.
pub trait ErrorHandler: Send + Sync {
    /// Log `err` and render it as a response
    fn handle(&self, cx: &RequestContext, err: BoxError) -> Response;
}

/// Error handler used unless the pipeline is built with another one
///
/// Resolves the error to a [`StatusError`] by walking its cause chain,
/// emits exactly one `tracing` error event per failed request (the only
/// place the full diagnostic detail is guaranteed to be recorded), and
/// renders the plain-text reason phrase. Errors that resolve to no known
/// status become 500 Internal Server Error, so unclassified detail is never
/// leaked to the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, cx: &RequestContext, err: BoxError) -> Response {
        let status = StatusError::resolve(err);
        let internal = status.internal_chain();
        tracing::error!(
            method = %cx.method(),
            path = cx.path(),
            code = status.code().as_u16(),
            status = status.reason(),
            internal = internal.as_deref(),
            "request failed"
        );

        response::plain_text(&status)
    }
}
