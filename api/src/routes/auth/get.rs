use crate::routes::common::UserResponse;
use crate::{auth::claims::AuthUser, response::ApiResponse};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Entity as UserEntity;
use sea_orm::EntityTrait;
use util::state::AppState;

/// GET /api/auth/me
///
/// Returns the authenticated user's profile.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "message": "User data retrieved successfully",
///   "data": {
///     "id": 42,
///     "username": "marge",
///     "name": "Marge Simpson",
///     "email": "marge@example.com",
///     "admin": false,
///     "affiliation": 3,
///     "created_at": "2025-05-29T12:34:56Z",
///     "updated_at": "2025-05-29T12:34:56Z"
///   }
/// }
/// ```
///
/// ### Error Responses
/// - `401 Unauthorized` – Missing or invalid token
/// - `404 Not Found` – User not found
/// - `500 Internal Server Error` – Database failure
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> impl IntoResponse {
    match UserEntity::find_by_id(claims.sub).one(app_state.db()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User data retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<UserResponse>::error("User not found")),
        ),
        Err(e) => {
            tracing::error!(error = %e, user_id = claims.sub, "failed to load current user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error("Database error")),
            )
        }
    }
}
