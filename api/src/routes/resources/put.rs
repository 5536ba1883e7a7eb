use super::common::{ResourceResponse, read_resource_form, remove_image, store_image};
use crate::{auth::claims::AuthUser, response::ApiResponse};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::{resource::Model as ResourceModel, user::Entity as UserEntity};
use sea_orm::EntityTrait;
use util::state::AppState;

/// PUT /api/resources/{resource_id}
///
/// Replace the fields of a resource. Allowed for admins and for users affiliated
/// with the resource. The image is only replaced when a new one is uploaded.
///
/// ### Request (multipart/form-data)
/// Same fields as `POST /api/resources`, with `image` optional.
///
/// ### Responses
/// - `200 OK` with the updated resource
/// - `400 Bad Request` – bad field values or image
/// - `401 Unauthorized` – `"Sorry, you don't have permission to edit this resource!"`
/// - `404 Not Found` – `"Resource not found"`
/// - `500 Internal Server Error`
pub async fn edit_resource(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(resource_id): Path<i64>,
    multipart: Multipart,
) -> impl IntoResponse {
    let db = app_state.db();

    let user = match UserEntity::find_by_id(claims.sub).one(db).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, user_id = claims.sub, "failed to load editing user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ResourceResponse>::error("Database error")),
            );
        }
    };

    if !user.is_some_and(|u| u.can_edit_resource(resource_id)) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<ResourceResponse>::error(
                "Sorry, you don't have permission to edit this resource!",
            )),
        );
    }

    let existing = match ResourceModel::get_by_id(db, resource_id).await {
        Ok(Some(resource)) => resource,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<ResourceResponse>::error("Resource not found")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, resource_id, "failed to load resource");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ResourceResponse>::error("Database error")),
            );
        }
    };

    let (form, image) = match read_resource_form(multipart).await {
        Ok(parts) => parts,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ResourceResponse>::error(message)),
            );
        }
    };

    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<ResourceResponse>::error(e.to_string())),
            );
        }
    };

    let new_image = match image {
        Some(image) => match store_image(&image).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!(error = %e, resource_id, "failed to store resource image");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<ResourceResponse>::error("Failed to store image")),
                );
            }
        },
        None => None,
    };

    match ResourceModel::update(db, resource_id, fields, new_image.clone()).await {
        Ok(updated) => {
            if new_image.is_some() {
                remove_image(&existing.image_path).await;
            }
            tracing::info!(resource_id, user_id = claims.sub, "updated resource");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    ResourceResponse::from(updated),
                    "Resource updated successfully",
                )),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, resource_id, "failed to update resource");
            if let Some(path) = &new_image {
                remove_image(path).await;
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<ResourceResponse>::error("Database error")),
            )
        }
    }
}
