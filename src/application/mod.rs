//! Application layer services implementing business logic.
//!
//! Services consume the repository trait and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::id_allocator::IdAllocator`] - Digest-window identifier allocation
//! - [`services::shorten_service::ShortenService`] - Idempotent short URL creation
//! - [`services::redirect_service::RedirectService`] - Lookup and hit-counted redirects

pub mod services;
