use super::common::ResourceResponse;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use db::models::resource::Model as ResourceModel;
use serde::{Deserialize, Serialize};
use services::resource_query::{ResourceQueryService, ResourceSummary, SearchQuery};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use util::{paths::resolve_stored, state::AppState};

/// Raw query string of a search. Parsing and defaults live in [`SearchQuery::from_params`].
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
    pub services: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct SearchResponse {
    pub resources: Vec<ResourceResponse>,
    #[serde(rename = "totalRes")]
    pub total_res: usize,
}

/// GET /api/resources
///
/// Searches resources in a city, ranked by how many of the requested services they offer.
///
/// ### Query Parameters
/// - `city` (optional): exact city name; empty or absent searches every city
/// - `services` (optional): comma separated service tags, e.g. `food,shelter`
/// - `page` (optional): 1-based page number; invalid values mean page 1
///
/// Resources offering more of the requested services come first. Ties keep insertion
/// order. Each page holds `PAGE_SIZE` resources (4 by default).
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": {
///     "resources": [
///       {
///         "id": 2,
///         "title": "Springfield Food Bank",
///         "address": "742 Evergreen Terrace",
///         "phone": "(555) 123-4567",
///         "website": "https://food.example",
///         "city": "Springfield",
///         "imageUrl": "/api/resources/2/image",
///         "services": { "food": "Hot meals", "shelter": "Beds" },
///         "dynamicData": { "hours": "9-5" },
///         "createdAt": "2025-05-29T12:00:00+00:00",
///         "updatedAt": "2025-05-29T12:00:00+00:00"
///       }
///     ],
///     "totalRes": 3
///   },
///   "message": "Resources retrieved successfully"
/// }
/// ```
///
/// `totalRes` counts every resource in the city, independent of `services` and `page`.
///
/// ### Error Responses
/// - `500 Internal Server Error` – Database failure
pub async fn search_resources(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = SearchQuery::from_params(params.city, params.services, params.page);
    let service = ResourceQueryService::new(app_state.db_clone(), app_state.page_size());

    match service.search(&query).await {
        Ok(page) => {
            let response = SearchResponse {
                resources: page.resources.into_iter().map(ResourceResponse::from).collect(),
                total_res: page.total_count,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    response,
                    "Resources retrieved successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, city = %query.city, "resource search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SearchResponse>::error("Database error")),
            )
        }
    }
}

/// GET /api/resources/picker
///
/// Title and id of every resource, for choosing an affiliation at registration.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": [ { "title": "Springfield Food Bank", "id": 2 } ],
///   "message": "Resources retrieved successfully"
/// }
/// ```
pub async fn list_resource_picker(State(app_state): State<AppState>) -> impl IntoResponse {
    let service = ResourceQueryService::new(app_state.db_clone(), app_state.page_size());

    match service.list_for_picker().await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::success(list, "Resources retrieved successfully")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to list resources for picker");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Vec<ResourceSummary>>::error("Database error")),
            )
        }
    }
}

/// GET /api/resources/{resource_id}
///
/// ### Responses
/// - `200 OK` with the resource (same shape as a search entry)
/// - `404 Not Found` – `"Resource not found"`
/// - `500 Internal Server Error`
pub async fn get_resource(
    State(app_state): State<AppState>,
    Path(resource_id): Path<i64>,
) -> impl IntoResponse {
    match ResourceModel::get_by_id(app_state.db(), resource_id).await {
        Ok(Some(resource)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ResourceResponse::from(resource),
                "Resource retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<ResourceResponse>::error("Resource not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, resource_id, "failed to load resource");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ResourceResponse>::error("Database error")),
            )
        }
    }
}

/// GET /api/resources/{resource_id}/image
///
/// Streams the stored image with a `Content-Type` guessed from its extension.
///
/// ### Error Responses
/// - `404 Not Found` – unknown resource or missing file
/// - `500 Internal Server Error`
pub async fn get_resource_image(
    State(app_state): State<AppState>,
    Path(resource_id): Path<i64>,
) -> Response {
    let resource = match ResourceModel::get_by_id(app_state.db(), resource_id).await {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Resource not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, resource_id, "failed to load resource");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Database error")),
            )
                .into_response();
        }
    };

    let fs_path = resolve_stored(&resource.image_path);
    let file = match File::open(&fs_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Image file missing")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, path = %fs_path.display(), "failed to open resource image");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Could not open image")),
            )
                .into_response();
        }
    };

    let mime = mime_guess::from_path(&fs_path)
        .first_or_octet_stream()
        .to_string();
    let content_type = HeaderValue::from_str(&mime)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response()
}
