use crate::auth::generate_jwt;
use crate::response::{ApiResponse, Empty, format_validation_errors};
use crate::routes::common::UserResponse;
use crate::services::email::EmailService;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::{
    password_reset_token::Model as PasswordResetTokenModel, resource::Model as ResourceModel,
    user::Model as UserModel,
};
use serde::{Deserialize, Serialize};
use util::{config, state::AppState};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username", message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[serde(default)]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Resource the new user represents, if any.
    pub affiliation: Option<i64>,
}

/// Usernames are stored trimmed, so whitespace alone counts as empty.
fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if username.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// POST /auth/register
///
/// Register a new user and send a welcome email.
///
/// ### Request Body
/// ```json
/// {
///   "username": "marge",
///   "password": "strongpassword",
///   "name": "Marge Simpson",
///   "email": "marge@example.com",
///   "affiliation": 3
/// }
/// ```
///
/// ### Responses
///
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": { "id": 1, "username": "marge", "name": "Marge Simpson", "email": "marge@example.com",
///             "admin": false, "affiliation": 3, "created_at": "...", "updated_at": "..." },
///   "message": "User registered successfully"
/// }
/// ```
///
/// - `400 Bad Request` (validation failure or unknown affiliation)
/// - `409 Conflict` (username or email already taken)
/// - `500 Internal Server Error`
///
/// A failed welcome email is logged and does not undo the registration.
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(error_message)),
        );
    }

    let db = app_state.db();

    match UserModel::exists_with(db, &req.username, &req.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<UserResponse>::error(
                    "A user with this username or email already exists",
                )),
            );
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!(error = %e, "failed to check for existing user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error("Database error")),
            );
        }
    }

    if let Some(resource_id) = req.affiliation {
        match ResourceModel::get_by_id(db, resource_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::<UserResponse>::error("Affiliated resource does not exist")),
                );
            }
            Err(e) => {
                tracing::error!(error = %e, resource_id, "failed to look up affiliation");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::<UserResponse>::error("Database error")),
                );
            }
        }
    }

    let user = match UserModel::create(
        db,
        &req.username,
        &req.name,
        &req.email,
        &req.password,
        false,
        req.affiliation,
    )
    .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "failed to create user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<UserResponse>::error("Database error")),
            );
        }
    };

    if let Err(e) = EmailService::send_welcome_email(&user.email, &user.username).await {
        tracing::warn!(error = %e, user_id = user.id, "failed to send welcome email");
    }

    tracing::info!(user_id = user.id, "registered user");
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(
            UserResponse::from(user),
            "User registered successfully",
        )),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email address.
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub name: String,
    pub admin: bool,
    pub affiliation: Option<i64>,
    pub token: String,
    pub expires_at: String,
}

/// POST /auth/login
///
/// Authenticate by username or email and issue a JWT.
///
/// ### Request Body
/// ```json
/// { "username": "marge@example.com", "password": "strongpassword" }
/// ```
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user_id": 1,
///     "username": "marge",
///     "name": "Marge Simpson",
///     "admin": false,
///     "affiliation": 3,
///     "token": "jwt_token_here",
///     "expires_at": "2025-05-29T12:00:00Z"
///   },
///   "message": "Login successful"
/// }
/// ```
///
/// - `401 Unauthorized`: `"User doesn't exist. Please double check username/email!"`
///   or `"Username/email and password don't match"`
/// - `500 Internal Server Error`
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(error_message)),
        );
    }

    let user = match UserModel::find_by_login(app_state.db(), &req.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<LoginResponse>::error(
                    "User doesn't exist. Please double check username/email!",
                )),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to look up user for login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<LoginResponse>::error("Database error")),
            );
        }
    };

    if !user.verify_password(&req.password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<LoginResponse>::error(
                "Username/email and password don't match",
            )),
        );
    }

    let (token, expires_at) = match generate_jwt(user.id, user.admin) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, user_id = user.id, "failed to sign token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<LoginResponse>::error("Could not create token")),
            );
        }
    };

    let response = LoginResponse {
        user_id: user.id,
        username: user.username,
        name: user.name,
        admin: user.admin,
        affiliation: user.affiliation,
        token,
        expires_at,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(response, "Login successful")),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct RequestPasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// POST /auth/request-password-reset
///
/// Creates a reset token and emails the reset link `{FRONTEND_URL}/reset/{token}`.
///
/// ### Request Body
/// ```json
/// { "email": "marge@example.com" }
/// ```
///
/// ### Responses
/// - `200 OK`: `"Password reset instructions have been sent to your email"`
/// - `400 Bad Request`: invalid email
/// - `404 Not Found`: `"No user exists!"`
/// - `500 Internal Server Error`: database or mail failure
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    Json(req): Json<RequestPasswordResetRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        );
    }

    let db = app_state.db();

    let user = match UserModel::get_by_email(db, &req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("No user exists!")),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to look up user for password reset");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            );
        }
    };

    let expiry_minutes = config::reset_token_expiry_minutes() as i64;
    let token = match PasswordResetTokenModel::create(db, user.id, expiry_minutes).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, user_id = user.id, "failed to create reset token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            );
        }
    };

    if let Err(e) = EmailService::send_password_reset_email(&user.email, &token.token).await {
        tracing::error!(error = %e, user_id = user.id, "failed to send password reset email");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Empty>::error(
                "Hmm something went wrong. Please try again!",
            )),
        );
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            Empty::default(),
            "Password reset instructions have been sent to your email",
        )),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyResetTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Serialize, Default)]
pub struct VerifyResetTokenResponse {
    pub user_id: i64,
}

/// POST /auth/verify-reset-token
///
/// Checks that a reset token is unused and unexpired.
///
/// ### Request Body
/// ```json
/// { "token": "9f86d0..." }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": { "user_id": 1 }, "message": "Token is valid" }
/// ```
/// - `400 Bad Request`: `"Invalid or expired token"`
/// - `500 Internal Server Error`
pub async fn verify_reset_token(
    State(app_state): State<AppState>,
    Json(req): Json<VerifyResetTokenRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<VerifyResetTokenResponse>::error(error_message)),
        );
    }

    match PasswordResetTokenModel::find_valid_token(app_state.db(), &req.token).await {
        Ok(Some(token)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                VerifyResetTokenResponse {
                    user_id: token.user_id,
                },
                "Token is valid",
            )),
        ),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<VerifyResetTokenResponse>::error(
                "Invalid or expired token",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to verify reset token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<VerifyResetTokenResponse>::error("Database error")),
            )
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub user_id: i64,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub confirm_password: String,
}

/// POST /auth/reset-password
///
/// Sets a new password using a valid reset token issued to `user_id`.
///
/// ### Request Body
/// ```json
/// {
///   "token": "9f86d0...",
///   "user_id": 1,
///   "password": "newstrongpassword",
///   "confirm_password": "newstrongpassword"
/// }
/// ```
///
/// ### Responses
/// - `200 OK`: `"Password has been reset successfully"`
/// - `400 Bad Request`: `"Passwords need to match!"` or password too short
/// - `401 Unauthorized`: token unknown, used, expired or issued to another user
/// - `500 Internal Server Error`
///
/// The token is consumed on success. A failed confirmation email is only logged.
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    if req.password != req.confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error("Passwords need to match!")),
        );
    }

    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(error_message)),
        );
    }

    let db = app_state.db();

    let token = match PasswordResetTokenModel::find_valid_for_user(db, &req.token, req.user_id)
        .await
    {
        Ok(Some(token)) => token,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<Empty>::error(
                    "Could not locate your account. Please try sending your email again on the Reset page.",
                )),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to look up reset token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            );
        }
    };

    let user = match UserModel::update_password(db, req.user_id, &req.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, user_id = req.user_id, "failed to update password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error")),
            );
        }
    };

    if let Err(e) = token.mark_as_used(db).await {
        tracing::error!(error = %e, token_id = token.id, "failed to consume reset token");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Empty>::error("Database error")),
        );
    }

    if let Err(e) = EmailService::send_password_changed_email(&user.email).await {
        tracing::warn!(error = %e, user_id = user.id, "failed to send password changed email");
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            Empty::default(),
            "Password has been reset successfully",
        )),
    )
}
