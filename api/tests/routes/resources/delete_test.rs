#[cfg(test)]
mod tests {
    use super::super::common::{seed_resource, seed_user};
    use crate::helpers::{TestApp, bearer, get_json_body, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header::AUTHORIZATION},
        response::Response,
    };
    use db::models::resource::Model as ResourceModel;
    use serial_test::serial;
    use tower::ServiceExt;
    use util::paths::resolve_stored;

    async fn delete(app: &TestApp, resource_id: i64, auth: String) -> Response {
        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/resources/{resource_id}"))
            .header(AUTHORIZATION, auth)
            .body(AxumBody::empty())
            .unwrap();
        app.router.clone().oneshot(req).await.unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn admin_deletes_resource_and_image() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &[]).await;
        let admin = seed_user(&app, "admin", true, None).await;

        let response = delete(&app, resource.id, bearer(admin.id, true)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Resource deleted successfully");

        assert!(ResourceModel::get_by_id(&app.db, resource.id).await.unwrap().is_none());
        assert!(!resolve_stored(&resource.image_path).exists());
    }

    #[tokio::test]
    #[serial]
    async fn affiliated_non_admin_cannot_delete() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &[]).await;
        let user = seed_user(&app, "lenny", false, Some(resource.id)).await;

        let response = delete(&app, resource.id, bearer(user.id, false)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(ResourceModel::get_by_id(&app.db, resource.id).await.unwrap().is_some());
    }

    #[tokio::test]
    #[serial]
    async fn deleting_missing_resource_is_404() {
        let app = make_test_app().await;
        let admin = seed_user(&app, "admin", true, None).await;

        let response = delete(&app, 9999, bearer(admin.id, true)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
