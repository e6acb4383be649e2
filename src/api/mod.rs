//! HTTP API layer.
//!
//! Translates requests into service calls and formats the responses.
//!
//! # Modules
//!
//! - [`dto`] - Request and response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration for `/shorten`

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
