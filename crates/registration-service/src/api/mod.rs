//! HTTP API for the registration service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::mailer::Mailer;
use crate::store::RegistrationStore;
use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// Both handles are created once at startup and only read by requests.
#[derive(Clone)]
pub struct AppState {
    /// Registration persistence
    pub store: Arc<dyn RegistrationStore>,
    /// Confirmation email delivery
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn RegistrationStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }
}

/// Create the API router.
///
/// The registration handler answers every path and method; it rejects
/// non-POST requests itself.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::register)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
