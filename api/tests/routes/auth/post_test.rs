#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, get_json_body, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header::CONTENT_TYPE},
        response::Response,
    };
    use db::models::{
        password_reset_token::{
            self, Entity as PasswordResetTokenEntity, Model as PasswordResetTokenModel,
        },
        user::Model as UserModel,
    };
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;

    async fn post_json(app: &TestApp, uri: &str, payload: Value) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(AxumBody::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap();

        app.router.clone().oneshot(req).await.unwrap()
    }

    async fn create_marge(app: &TestApp) -> UserModel {
        UserModel::create(
            &app.db,
            "marge",
            "Marge Simpson",
            "marge@example.com",
            "bluehair99",
            false,
            None,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_register_success() {
        let app = make_test_app().await;
        let payload = json!({
            "username": "homer",
            "name": "Homer Simpson",
            "email": "homer@example.com",
            "password": "donuts123"
        });

        let response = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "User registered successfully");
        assert_eq!(json["data"]["username"], "homer");
        assert_eq!(json["data"]["email"], "homer@example.com");
        assert_eq!(json["data"]["admin"], false);
        assert!(json["data"]["affiliation"].is_null());
        assert!(json["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_register_duplicate_username_or_email() {
        let app = make_test_app().await;
        create_marge(&app).await;

        let payload = json!({
            "username": "someone_else",
            "email": "marge@example.com",
            "password": "password123"
        });
        let response = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["message"],
            "A user with this username or email already exists"
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_register_short_password() {
        let app = make_test_app().await;
        let payload = json!({
            "username": "bart",
            "email": "bart@example.com",
            "password": "short"
        });

        let response = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("Password must be at least 8 characters")
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_register_blank_username() {
        let app = make_test_app().await;
        let payload = json!({
            "username": "   ",
            "email": "maggie@example.com",
            "password": "pacifier1"
        });

        let response = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Username is required");
        assert!(!UserModel::exists_with(&app.db, "", "maggie@example.com").await.unwrap());
    }

    #[tokio::test]
    #[serial]
    async fn test_register_unknown_affiliation() {
        let app = make_test_app().await;
        let payload = json!({
            "username": "lisa",
            "email": "lisa@example.com",
            "password": "saxophone1",
            "affiliation": 999
        });

        let response = post_json(&app, "/api/auth/register", payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Affiliated resource does not exist");
    }

    #[tokio::test]
    #[serial]
    async fn test_login_with_username_or_email() {
        let app = make_test_app().await;
        let marge = create_marge(&app).await;

        for login in ["marge", "marge@example.com"] {
            let payload = json!({ "username": login, "password": "bluehair99" });
            let response = post_json(&app, "/api/auth/login", payload).await;
            assert_eq!(response.status(), StatusCode::OK);

            let json = get_json_body(response).await;
            assert_eq!(json["message"], "Login successful");
            assert_eq!(json["data"]["user_id"], marge.id);
            assert_eq!(json["data"]["admin"], false);
            assert!(!json["data"]["token"].as_str().unwrap().is_empty());
            assert!(json["data"]["expires_at"].as_str().is_some());
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_login_unknown_user() {
        let app = make_test_app().await;
        let payload = json!({ "username": "nobody", "password": "whatever1" });

        let response = post_json(&app, "/api/auth/login", payload).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(
            json["message"],
            "User doesn't exist. Please double check username/email!"
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_login_wrong_password() {
        let app = make_test_app().await;
        create_marge(&app).await;
        let payload = json!({ "username": "marge", "password": "wrongpass" });

        let response = post_json(&app, "/api/auth/login", payload).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Username/email and password don't match");
    }

    #[tokio::test]
    #[serial]
    async fn test_request_password_reset_unknown_email() {
        let app = make_test_app().await;
        let payload = json!({ "email": "ghost@example.com" });

        let response = post_json(&app, "/api/auth/request-password-reset", payload).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "No user exists!");
    }

    #[tokio::test]
    #[serial]
    async fn test_request_password_reset_without_mail_transport() {
        let app = make_test_app().await;
        let marge = create_marge(&app).await;
        let payload = json!({ "email": "marge@example.com" });

        let response = post_json(&app, "/api/auth/request-password-reset", payload).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Hmm something went wrong. Please try again!");

        // The token is stored before the mail is attempted.
        let stored = PasswordResetTokenEntity::find()
            .filter(password_reset_token::Column::UserId.eq(marge.id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_verify_reset_token() {
        let app = make_test_app().await;
        let marge = create_marge(&app).await;
        let token = PasswordResetTokenModel::create(&app.db, marge.id, 60).await.unwrap();

        let response = post_json(
            &app,
            "/api/auth/verify-reset-token",
            json!({ "token": token.token }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Token is valid");
        assert_eq!(json["data"]["user_id"], marge.id);

        let response = post_json(
            &app,
            "/api/auth/verify-reset-token",
            json!({ "token": "not-a-real-token" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Invalid or expired token");
    }

    #[tokio::test]
    #[serial]
    async fn test_verify_expired_reset_token() {
        let app = make_test_app().await;
        let marge = create_marge(&app).await;
        let token = PasswordResetTokenModel::create(&app.db, marge.id, -5).await.unwrap();

        let response = post_json(
            &app,
            "/api/auth/verify-reset-token",
            json!({ "token": token.token }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn test_reset_password_mismatch() {
        let app = make_test_app().await;
        let payload = json!({
            "token": "anything",
            "user_id": 1,
            "password": "newpassword1",
            "confirm_password": "newpassword2"
        });

        let response = post_json(&app, "/api/auth/reset-password", payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Passwords need to match!");
    }

    #[tokio::test]
    #[serial]
    async fn test_reset_password_token_of_other_user() {
        let app = make_test_app().await;
        let marge = create_marge(&app).await;
        let token = PasswordResetTokenModel::create(&app.db, marge.id, 60).await.unwrap();

        let payload = json!({
            "token": token.token,
            "user_id": marge.id + 1,
            "password": "newpassword1",
            "confirm_password": "newpassword1"
        });
        let response = post_json(&app, "/api/auth/reset-password", payload).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(
            json["message"],
            "Could not locate your account. Please try sending your email again on the Reset page."
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_reset_password_success_consumes_token() {
        let app = make_test_app().await;
        let marge = create_marge(&app).await;
        let token = PasswordResetTokenModel::create(&app.db, marge.id, 60).await.unwrap();

        let payload = json!({
            "token": token.token,
            "user_id": marge.id,
            "password": "purplehair1",
            "confirm_password": "purplehair1"
        });
        let response = post_json(&app, "/api/auth/reset-password", payload.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Password has been reset successfully");

        let response = post_json(
            &app,
            "/api/auth/login",
            json!({ "username": "marge", "password": "purplehair1" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = post_json(&app, "/api/auth/reset-password", payload).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
