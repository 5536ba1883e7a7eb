use super::common::remove_image;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::resource::Model as ResourceModel;
use util::state::AppState;

/// DELETE /api/resources/{resource_id}
///
/// Delete a resource and its stored image. Admin only.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": {}, "message": "Resource deleted successfully" }
/// ```
/// - `404 Not Found` – `"Resource not found"`
/// - `500 Internal Server Error`
pub async fn delete_resource(
    State(app_state): State<AppState>,
    Path(resource_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    let resource = match ResourceModel::get_by_id(db, resource_id).await {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("Resource not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, resource_id, "failed to load resource");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            );
        }
    };

    if let Err(e) = ResourceModel::delete(db, resource_id).await {
        tracing::error!(error = %e, resource_id, "failed to delete resource");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Empty>::error("Database error")),
        );
    }

    remove_image(&resource.image_path).await;
    tracing::info!(resource_id, "deleted resource");

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            Empty::default(),
            "Resource deleted successfully",
        )),
    )
}
