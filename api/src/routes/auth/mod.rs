//! # auth Routes Module
//!
//! Routes for the `/auth` endpoint group.
//!
//! ## Structure
//! - `post.rs`: POST handlers (register, login, password reset)
//! - `get.rs`: GET handlers (current user info)

pub mod get;
pub mod post;

use crate::auth::guards::allow_authenticated;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

use get::get_me;
use post::{login, register, request_password_reset, reset_password, verify_reset_token};

/// Builds the `/auth` route group, mapping HTTP methods to handlers.
///
/// - `POST /auth/register` → `register`
/// - `POST /auth/login` → `login`
/// - `POST /auth/request-password-reset` → `request_password_reset`
/// - `POST /auth/verify-reset-token` → `verify_reset_token`
/// - `POST /auth/reset-password` → `reset_password`
/// - `GET /auth/me` → `get_me` (authenticated)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/request-password-reset", post(request_password_reset))
        .route("/verify-reset-token", post(verify_reset_token))
        .route("/reset-password", post(reset_password))
        .route("/me", get(get_me).route_layer(from_fn(allow_authenticated)))
}
