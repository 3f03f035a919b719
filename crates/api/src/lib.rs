//! HTTP API: authentication middleware, per-request abilities and the
//! authorization endpoints front-ends consume.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
