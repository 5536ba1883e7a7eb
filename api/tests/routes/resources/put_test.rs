#[cfg(test)]
mod tests {
    use super::super::common::{PNG_BYTES, seed_resource, seed_user};
    use crate::helpers::{MultipartBuilder, TestApp, bearer, get_json_body, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{
            Request, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
        response::Response,
    };
    use db::models::resource::Model as ResourceModel;
    use serial_test::serial;
    use tower::ServiceExt;
    use util::paths::resolve_stored;

    async fn put_form(app: &TestApp, resource_id: i64, auth: String, body: AxumBody) -> Response {
        let req = Request::builder()
            .method("PUT")
            .uri(format!("/api/resources/{resource_id}"))
            .header(CONTENT_TYPE, MultipartBuilder::content_type())
            .header(AUTHORIZATION, auth)
            .body(body)
            .unwrap();
        app.router.clone().oneshot(req).await.unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn affiliated_user_edits_without_new_image() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Old Name", "Springfield", &["food"]).await;
        let user = seed_user(&app, "lenny", false, Some(resource.id)).await;

        let body = MultipartBuilder::new()
            .resource_fields("new name", "Shelbyville")
            .build();
        let response = put_form(&app, resource.id, bearer(user.id, false), body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Resource updated successfully");
        assert_eq!(json["data"]["title"], "New Name");
        assert_eq!(json["data"]["city"], "Shelbyville");

        let stored = ResourceModel::get_by_id(&app.db, resource.id).await.unwrap().unwrap();
        assert_eq!(stored.image_path, resource.image_path);
        assert!(resolve_stored(&stored.image_path).exists());
    }

    #[tokio::test]
    #[serial]
    async fn new_image_replaces_old_file() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &[]).await;
        let admin = seed_user(&app, "admin", true, None).await;

        let body = MultipartBuilder::new()
            .resource_fields("Mission", "Springfield")
            .file("image", "new.gif", "image/gif", b"GIF89a")
            .build();
        let response = put_form(&app, resource.id, bearer(admin.id, true), body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let stored = ResourceModel::get_by_id(&app.db, resource.id).await.unwrap().unwrap();
        assert_ne!(stored.image_path, resource.image_path);
        assert!(stored.image_path.ends_with(".gif"));
        assert!(resolve_stored(&stored.image_path).exists());
        assert!(!resolve_stored(&resource.image_path).exists());
    }

    #[tokio::test]
    #[serial]
    async fn unaffiliated_user_cannot_edit() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &[]).await;
        let other = seed_resource(&app, "Other", "Springfield", &[]).await;
        let user = seed_user(&app, "carl", false, Some(other.id)).await;

        let body = MultipartBuilder::new()
            .resource_fields("Hijacked", "Springfield")
            .file("image", "x.png", "image/png", PNG_BYTES)
            .build();
        let response = put_form(&app, resource.id, bearer(user.id, false), body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(
            json["message"],
            "Sorry, you don't have permission to edit this resource!"
        );

        let stored = ResourceModel::get_by_id(&app.db, resource.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Mission");
    }

    #[tokio::test]
    #[serial]
    async fn editing_missing_resource_is_404() {
        let app = make_test_app().await;
        let admin = seed_user(&app, "admin", true, None).await;

        let body = MultipartBuilder::new()
            .resource_fields("Ghost", "Springfield")
            .build();
        let response = put_form(&app, 9999, bearer(admin.id, true), body).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_form_leaves_resource_unchanged() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &[]).await;
        let admin = seed_user(&app, "admin", true, None).await;

        let body = MultipartBuilder::new()
            .resource_fields("Mission", "Springfield")
            .text("services", "[1, 2]")
            .build();
        let response = put_form(&app, resource.id, bearer(admin.id, true), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stored = ResourceModel::get_by_id(&app.db, resource.id).await.unwrap().unwrap();
        assert_eq!(stored.title, resource.title);
        assert_eq!(stored.services, resource.services);
    }
}
