//! # Resources Routes Module
//!
//! Routes for the `/api/resources` endpoint group.
//!
//! ## Structure
//! - `get.rs`: search, picker list, details, image download (public)
//! - `post.rs`: create (admin)
//! - `put.rs`: edit (affiliated user or admin)
//! - `delete.rs`: delete (admin)
//! - `common.rs`: response types, multipart form reading, image storage

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::state::AppState;

use common::MAX_IMAGE_BYTES;
use delete::delete_resource;
use get::{get_resource, get_resource_image, list_resource_picker, search_resources};
use post::create_resource;
use put::edit_resource;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Room for the text fields and multipart framing around the largest image.
const MAX_FORM_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Builds the `/resources` route group.
///
/// - `GET /resources?city=&services=&page=` → `search_resources`
/// - `GET /resources/picker` → `list_resource_picker`
/// - `GET /resources/{resource_id}` → `get_resource`
/// - `GET /resources/{resource_id}/image` → `get_resource_image`
/// - `POST /resources` → `create_resource` (admin only)
/// - `PUT /resources/{resource_id}` → `edit_resource` (authenticated, permission checked in handler)
/// - `DELETE /resources/{resource_id}` → `delete_resource` (admin only)
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_resources))
        .route(
            "/",
            post(create_resource)
                .route_layer(from_fn(allow_admin))
                .layer(DefaultBodyLimit::max(MAX_FORM_BYTES)),
        )
        .route("/picker", get(list_resource_picker))
        .route("/{resource_id}", get(get_resource))
        .route(
            "/{resource_id}",
            put(edit_resource)
                .route_layer(from_fn(allow_authenticated))
                .layer(DefaultBodyLimit::max(MAX_FORM_BYTES)),
        )
        .route(
            "/{resource_id}",
            delete(delete_resource).route_layer(from_fn(allow_admin)),
        )
        .route("/{resource_id}/image", get(get_resource_image))
}
