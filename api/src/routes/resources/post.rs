use super::common::{read_resource_form, remove_image, store_image};
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::resource::Model as ResourceModel;
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct AffiliationResponse {
    /// Id of the new resource, used as a user's affiliation.
    pub affiliation: i64,
}

/// POST /api/resources
///
/// Create a resource. Admin only.
///
/// ### Request (multipart/form-data)
/// - `title`, `address`, `phone`, `city` (required), `website` (optional)
/// - `services`: JSON object of service tag → description, e.g. `{"food":"Hot meals"}`
/// - `dynamicData`: JSON object of extra fields
/// - `image` (required): `image/jpeg`, `image/png`, `image/gif` or `image/webp`, at most 5 MB
///
/// The title has each word capitalised; the phone is stored as `(ddd) ddd-dddd`.
///
/// ### Responses
/// - `201 Created`
/// ```json
/// { "success": true, "data": { "affiliation": 7 }, "message": "Resource created successfully" }
/// ```
/// - `400 Bad Request` – missing image, bad field values, unsupported or oversized image
/// - `401 Unauthorized` / `403 Forbidden` – not an admin
/// - `500 Internal Server Error`
pub async fn create_resource(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let (form, image) = match read_resource_form(multipart).await {
        Ok(parts) => parts,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<AffiliationResponse>::error(message)),
            );
        }
    };

    let Some(image) = image else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AffiliationResponse>::error(
                "No image provided or did not load properly! Try again",
            )),
        );
    };

    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<AffiliationResponse>::error(e.to_string())),
            );
        }
    };

    let image_path = match store_image(&image).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!(error = %e, "failed to store resource image");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AffiliationResponse>::error("Failed to store image")),
            );
        }
    };

    match ResourceModel::create(app_state.db(), fields, &image_path).await {
        Ok(resource) => {
            tracing::info!(resource_id = resource.id, "created resource");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    AffiliationResponse {
                        affiliation: resource.id,
                    },
                    "Resource created successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to insert resource");
            remove_image(&image_path).await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AffiliationResponse>::error("Database error")),
            )
        }
    }
}
