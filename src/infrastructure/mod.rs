//! Infrastructure layer for external integrations.
//!
//! Implements the repository trait defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL, Redis and in-memory record stores

pub mod persistence;
