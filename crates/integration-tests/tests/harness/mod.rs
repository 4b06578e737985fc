//! Shared test harness: a demo service and a server wrapper around it

pub mod app;
pub mod server;
