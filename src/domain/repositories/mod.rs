//! Repository trait definitions for the domain layer.
//!
//! Traits define the data access contract; implementations live in
//! `crate::infrastructure::persistence`. Mocks are generated with `mockall`
//! for service tests.

pub mod short_url_repository;

pub use short_url_repository::{DuplicateKey, ShortUrlRepository, StoreError};

#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
