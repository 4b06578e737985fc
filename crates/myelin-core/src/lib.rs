//! Core types for myelin: the status-coded error model and the per-request
//! context
//!
//! Kept free of any transport framework so error types can cross crate
//! boundaries without dragging axum along. The adapter layer lives in the
//! `myelin` crate.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod context;
mod error;

pub use context::RequestContext;
pub use error::{BoxError, StatusError};
