//! The strategy configuration shared by every endpoint

use std::sync::Arc;

use axum::response::Response;
use myelin_core::{BoxError, RequestContext};

use crate::error_handler::{DefaultErrorHandler, ErrorHandler};
use crate::response::Reply;
use crate::validate::{DefaultValidator, Validator};

/// Default cap on inbound request bodies (2 MiB)
const DEFAULT_BODY_LIMIT: usize = 2 << 20;

/// The strategy configuration for request dispatch
///
/// Holds the validator, the error handler, and the body-size limit; the
/// decode and respond strategies travel with the request/response types
/// themselves as their [`Bind`](crate::Bind) and [`Reply`] impls. Built once
/// at startup, then shared by every endpoint created from it:
///
/// ```
/// use myelin::Pipeline;
///
/// let pipeline = Pipeline::builder().body_limit(64 * 1024).build();
/// ```
///
/// Cloning is cheap (the configuration sits behind an [`Arc`]), and there is
/// no post-build mutation: concurrent reads while serving are the only
/// supported access.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    validator: Box<dyn Validator>,
    error_handler: Box<dyn ErrorHandler>,
    body_limit: usize,
}

impl Pipeline {
    /// Start configuring a pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The unified respond seam
    ///
    /// A success value renders through its [`Reply`] capability; its render
    /// failure, like any error result, is routed to the error handler. The
    /// caller never branches on success versus failure for output, only for
    /// which value to pass in.
    pub fn respond<Res: Reply>(&self, cx: &RequestContext, result: Result<Res, BoxError>) -> Response {
        match result.and_then(|value| value.render(cx)) {
            Ok(response) => response,
            Err(err) => self.inner.error_handler.handle(cx, err),
        }
    }

    pub(crate) fn validator(&self) -> &dyn Validator {
        self.inner.validator.as_ref()
    }

    pub(crate) fn body_limit(&self) -> usize {
        self.inner.body_limit
    }
}

impl Default for Pipeline {
    /// Pipeline with the default strategies and body limit
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`Pipeline`]
///
/// Every knob has a default, so `Pipeline::builder().build()` is the stock
/// configuration. Strategy replacement happens here and only here; once
/// built, a pipeline never changes.
pub struct PipelineBuilder {
    validator: Box<dyn Validator>,
    error_handler: Box<dyn ErrorHandler>,
    body_limit: usize,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            validator: Box::new(DefaultValidator),
            error_handler: Box::new(DefaultErrorHandler),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl PipelineBuilder {
    /// Replace the validation strategy
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Replace the error-handling strategy
    #[must_use]
    pub fn error_handler(mut self, error_handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Box::new(error_handler);
        self
    }

    /// Cap inbound request bodies at `bytes`; larger bodies answer 413
    #[must_use]
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Finish the configuration
    pub fn build(self) -> Pipeline {
        Pipeline {
            inner: Arc::new(PipelineInner {
                validator: self.validator,
                error_handler: self.error_handler,
                body_limit: self.body_limit,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use myelin_core::StatusError;
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Serialize)]
    struct Pong {
        ok: bool,
    }

    impl Reply for Pong {}

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn respond_renders_a_success_value() {
        let pipeline = Pipeline::default();

        let response = pipeline.respond(&RequestContext::empty(), Ok(Pong { ok: true }));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn respond_routes_errors_to_the_error_handler() {
        let pipeline = Pipeline::default();
        let result: Result<Pong, BoxError> = Err(StatusError::TOO_MANY_REQUESTS.into());

        let response = pipeline.respond(&RequestContext::empty(), result);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_of(response).await, "Too Many Requests");
    }

    #[tokio::test]
    async fn render_failure_lands_in_the_error_handler() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("cyclic value"))
            }
        }

        impl Reply for Broken {}

        let pipeline = Pipeline::default();
        let response = pipeline.respond(&RequestContext::empty(), Ok(Broken));

        // Nothing was written when the encoder failed, so the request still
        // gets a well-formed error response.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "Internal Server Error");
    }

    #[tokio::test]
    async fn custom_error_handler_replaces_the_default() {
        struct TeapotHandler;

        impl ErrorHandler for TeapotHandler {
            fn handle(&self, _cx: &RequestContext, _err: BoxError) -> Response {
                crate::response::plain_text(&StatusError::IM_A_TEAPOT)
            }
        }

        let pipeline = Pipeline::builder().error_handler(TeapotHandler).build();
        let result: Result<Pong, BoxError> = Err("anything".into());

        let response = pipeline.respond(&RequestContext::empty(), result);
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
