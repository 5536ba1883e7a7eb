//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Registration, login, password reset (public) and `/auth/me` (authenticated)
//! - `/resources` → Resource search and details (public), create/delete (admin),
//!   edit (affiliated user or admin)

use crate::routes::{auth::auth_routes, health::health_routes, resources::resource_routes};
use axum::Router;
use util::state::AppState;

pub mod auth;
pub mod common;
pub mod health;
pub mod resources;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router already carries `app_state` and is meant to be nested
/// under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/resources", resource_routes())
        .with_state(app_state)
}
