//! Typed request dispatch for axum services
//!
//! Adapts a typed business handler (`Req -> Res` or error) into a uniform
//! transport endpoint that runs decode, validate, invoke, respond, with a
//! status-coded error contract and exactly one structured log record per
//! failed request. The decode and respond seams belong to the request and
//! response types themselves ([`Bind`] and [`Reply`]); the validation and
//! error-handling strategies are configured once on a [`Pipeline`] and shared
//! by every endpoint built from it.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod endpoint;
mod error_handler;
mod handler;
mod pipeline;
pub mod request;
pub mod response;
mod validate;

pub use endpoint::Endpoint;
pub use error_handler::{DefaultErrorHandler, ErrorHandler};
pub use handler::Handler;
pub use myelin_core::{BoxError, RequestContext, StatusError};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use request::Bind;
pub use response::Reply;
pub use validate::{DefaultValidator, Validate, Validator, Violations};
