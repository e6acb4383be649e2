//! Business logic services for the application layer.

pub mod id_allocator;
pub mod redirect_service;
pub mod shorten_service;

pub use id_allocator::{AllocationError, IdAllocator, candidate_windows};
pub use redirect_service::RedirectService;
pub use shorten_service::ShortenService;
