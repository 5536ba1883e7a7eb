#[cfg(test)]
mod tests {
    use api::auth::claims::{AuthUser, Claims};
    use axum::{
        extract::FromRequestParts,
        http::{Request, StatusCode},
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serial_test::serial;
    use std::time::{SystemTime, UNIX_EPOCH};
    use util::config::AppConfig;

    fn generate_token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    fn now() -> usize {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
    }

    async fn extract(authorization: Option<String>) -> Result<AuthUser, (StatusCode, &'static str)> {
        let mut builder = Request::builder();
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    #[serial]
    async fn valid_token_yields_claims() {
        AppConfig::set_jwt_secret("test_secret");
        let claims = Claims {
            sub: 1,
            exp: now() + 3600,
            admin: true,
        };
        let token = generate_token(&claims, "test_secret");

        let auth_user = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(auth_user.0.sub, 1);
        assert!(auth_user.0.admin);
    }

    #[tokio::test]
    #[serial]
    async fn token_signed_with_another_secret_is_rejected() {
        AppConfig::set_jwt_secret("test_secret");
        let claims = Claims {
            sub: 1,
            exp: now() + 3600,
            admin: false,
        };
        let token = generate_token(&claims, "wrong_secret");

        let (status, message) = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    #[serial]
    async fn expired_token_is_rejected() {
        AppConfig::set_jwt_secret("test_secret");
        let claims = Claims {
            sub: 2,
            exp: now() - 3600,
            admin: true,
        };
        let token = generate_token(&claims, "test_secret");

        let (status, message) = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let (status, message) = extract(None).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Missing or invalid Authorization header");
    }

    #[tokio::test]
    async fn bearer_without_token_is_rejected() {
        let (status, message) = extract(Some("Bearer".into())).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Missing or invalid Authorization header");
    }
}
