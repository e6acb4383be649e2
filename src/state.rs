//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{RedirectService, ShortenService};
use crate::domain::repositories::ShortUrlRepository;

/// Handles to the services, cloned per request.
///
/// All services share one repository; the state itself carries no mutable
/// data.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn ShortUrlRepository>>,
    pub redirect_service: Arc<RedirectService<dyn ShortUrlRepository>>,
    pub repository: Arc<dyn ShortUrlRepository>,
}

impl AppState {
    /// Builds the services on top of a connected repository.
    pub fn new(repository: Arc<dyn ShortUrlRepository>) -> Self {
        Self {
            shorten_service: Arc::new(ShortenService::new(repository.clone())),
            redirect_service: Arc::new(RedirectService::new(repository.clone())),
            repository,
        }
    }
}
