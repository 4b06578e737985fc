//! The handler adapter: typed dispatch behind a uniform transport endpoint

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::response::Response;
use futures_util::future::BoxFuture;
use http::Request;
use http_body_util::LengthLimitError;
use myelin_core::{BoxError, RequestContext, StatusError};

use crate::handler::Handler;
use crate::pipeline::Pipeline;
use crate::request::Bind;
use crate::response::Reply;
use crate::validate::Validate;

impl Pipeline {
    /// Adapt a typed business handler into a transport endpoint
    ///
    /// The request and response types are erased here, so the surrounding
    /// router mounts every endpoint the same way:
    ///
    /// ```
    /// use axum::{Router, routing::post_service};
    /// use myelin::{Bind, BoxError, Pipeline, Reply, RequestContext, Validate};
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Deserialize)]
    /// struct Echo {
    ///     message: String,
    /// }
    ///
    /// impl Bind for Echo {}
    /// impl Validate for Echo {}
    ///
    /// #[derive(Serialize)]
    /// struct Echoed {
    ///     message: String,
    /// }
    ///
    /// impl Reply for Echoed {}
    ///
    /// async fn echo(_cx: RequestContext, req: Echo) -> Result<Echoed, BoxError> {
    ///     Ok(Echoed { message: req.message })
    /// }
    ///
    /// let pipeline = Pipeline::default();
    /// let app: Router = Router::new().route("/echo", post_service(pipeline.endpoint(echo)));
    /// ```
    ///
    /// Each request runs decode, validate, invoke, respond in order; the
    /// first failing stage skips the remaining ones and goes straight to
    /// error rendering. Every request ends in exactly one response, with no
    /// retries at this layer.
    ///
    /// The endpoint spawns no tasks: if the client disconnects, the
    /// transport drops the request future and cancellation reaches whatever
    /// stage was running, so no response is built for a dead connection.
    pub fn endpoint<Req, Res, H>(&self, handler: H) -> Endpoint
    where
        Req: Bind + Validate + Send + 'static,
        Res: Reply + 'static,
        H: Handler<Req, Res> + 'static,
    {
        let pipeline = self.clone();
        let handler = Arc::new(handler);

        Endpoint {
            run: Arc::new(move |request| {
                let pipeline = pipeline.clone();
                let handler = Arc::clone(&handler);
                Box::pin(async move {
                    let (parts, body) = request.into_parts();
                    let cx = RequestContext::new(parts);
                    tracing::debug!(method = %cx.method(), path = cx.path(), "dispatching request");

                    let result = dispatch(&pipeline, handler.as_ref(), &cx, body).await;
                    pipeline.respond(&cx, result)
                })
            }),
        }
    }
}

/// The erased per-request run function holding the whole pipeline
type RunFn = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// A type-erased dispatch endpoint produced by [`Pipeline::endpoint`]
///
/// A [`tower::Service`] from requests to responses that never errors at the
/// service level: every failure has already been rendered into the response
/// by the pipeline's error handler.
#[derive(Clone)]
pub struct Endpoint {
    run: RunFn,
}

impl tower::Service<Request<Body>> for Endpoint {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let run = Arc::clone(&self.run);
        Box::pin(async move { Ok(run(request).await) })
    }
}

/// Decode, validate, invoke: the pre-respond half of the per-request state
/// machine, short-circuiting on the first failure
async fn dispatch<Req, Res, H>(
    pipeline: &Pipeline,
    handler: &H,
    cx: &RequestContext,
    body: Body,
) -> Result<Res, BoxError>
where
    Req: Bind + Validate + Send,
    Res: Reply,
    H: Handler<Req, Res>,
{
    let bytes = collect(body, pipeline.body_limit()).await?;
    let req = Req::bind(cx, &bytes)?;
    pipeline.validator().validate(cx, &req)?;
    handler.handle(cx.clone(), req).await
}

/// Read the request body, capped at `limit` bytes
///
/// Overflow maps to 413; any other read failure is the client's framing
/// (400).
async fn collect(body: Body, limit: usize) -> Result<Bytes, StatusError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if is_length_limit(&err) {
            StatusError::PAYLOAD_TOO_LARGE.with_internal(err)
        } else {
            StatusError::BAD_REQUEST.with_internal(err)
        }
    })
}

/// Whether a body-read failure was the configured size cap firing
fn is_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<LengthLimitError>() {
            return true;
        }
        current = err.source();
    }
    false
}
