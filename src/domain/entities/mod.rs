//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence logic.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A short identifier mapped to its target URL

pub mod short_url;

pub use short_url::{SHORT_ID_LEN, ShortUrl, is_well_formed_id};
