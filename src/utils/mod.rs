//! Utility functions used across the application.
//!
//! - [`fingerprint`] - Deterministic URL digests
//! - [`target_url`] - Validation of URLs submitted for shortening

pub mod fingerprint;
pub mod target_url;
