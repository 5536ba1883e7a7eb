use crate::response::ApiResponse;
use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use util::state::AppState;

/// Builds the `/health` route group: a single public `GET /health`.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Reports whether the API is up and its database answers.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": "OK", "message": "Health check passed" }
/// ```
/// - `503 Service Unavailable`
/// ```json
/// { "success": false, "data": "", "message": "Database unavailable" }
/// ```
async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success("OK", "Health check passed")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed to reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<&str>::error("Database unavailable")),
            )
        }
    }
}
