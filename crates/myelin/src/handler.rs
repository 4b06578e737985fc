//! The business-handler seam: typed application logic behind the pipeline

use std::future::Future;

use async_trait::async_trait;
use myelin_core::{BoxError, RequestContext};

/// A typed business handler, the only application logic in the pipeline
///
/// Receives a decoded, validated request and produces a response value or an
/// error. Returning a [`StatusError`](myelin_core::StatusError) (directly or
/// anywhere in the error's cause chain) selects the client-visible status;
/// any other error renders as 500 with the detail kept in the log record.
///
/// Plain async functions and closures are handlers as-is, so most endpoints
/// never name this trait:
///
/// ```
/// use myelin::{BoxError, RequestContext};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Deserialize)]
/// # struct CreateOrder { sku: String }
/// # #[derive(Serialize)]
/// # struct OrderPlaced { id: u64 }
///
/// async fn place_order(_cx: RequestContext, req: CreateOrder) -> Result<OrderPlaced, BoxError> {
///     let _ = req.sku;
///     Ok(OrderPlaced { id: 1 })
/// }
/// ```
///
/// Implement the trait directly for handlers that carry state worth naming
/// (a repository, a client pool, ...).
#[async_trait]
pub trait Handler<Req, Res>: Send + Sync {
    /// Handle one request
    async fn handle(&self, cx: RequestContext, req: Req) -> Result<Res, BoxError>;
}

#[async_trait]
impl<F, Fut, Req, Res, E> Handler<Req, Res> for F
where
    F: Fn(RequestContext, Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Res, E>> + Send,
    Req: Send + 'static,
    E: Into<BoxError>,
{
    async fn handle(&self, cx: RequestContext, req: Req) -> Result<Res, BoxError> {
        self(cx, req).await.map_err(Into::into)
    }
}
