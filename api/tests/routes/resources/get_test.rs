#[cfg(test)]
mod tests {
    use super::super::common::{PNG_BYTES, ids, seed_resource};
    use crate::helpers::{TestApp, get_json_body, make_test_app};
    use axum::{
        body::Body as AxumBody,
        http::{Request, StatusCode, header::CONTENT_TYPE},
        response::Response,
    };
    use serial_test::serial;
    use tower::ServiceExt;

    async fn get(app: &TestApp, uri: &str) -> Response {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(AxumBody::empty())
            .unwrap();
        app.router.clone().oneshot(req).await.unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn search_ranks_by_matching_services() {
        let app = make_test_app().await;
        let r1 = seed_resource(&app, "Pantry", "Springfield", &["food"]).await;
        let r2 = seed_resource(&app, "Mission", "Springfield", &["food", "shelter"]).await;
        let r3 = seed_resource(&app, "Legal Aid", "Springfield", &["legal"]).await;
        seed_resource(&app, "Elsewhere", "Shelbyville", &["food", "shelter"]).await;

        let response = get(&app, "/api/resources?city=Springfield&services=food,shelter").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["totalRes"], 3);
        assert_eq!(ids(&json), vec![r2.id, r1.id, r3.id]);
    }

    #[tokio::test]
    #[serial]
    async fn search_without_services_keeps_insertion_order() {
        let app = make_test_app().await;
        let a = seed_resource(&app, "A", "Springfield", &["legal"]).await;
        let b = seed_resource(&app, "B", "Springfield", &["food"]).await;

        let json = get_json_body(get(&app, "/api/resources?city=Springfield").await).await;
        assert_eq!(ids(&json), vec![a.id, b.id]);
    }

    #[tokio::test]
    #[serial]
    async fn search_pages_hold_four_resources() {
        let app = make_test_app().await;
        let mut seeded = Vec::new();
        for i in 0..6 {
            seeded.push(seed_resource(&app, &format!("R{i}"), "Springfield", &[]).await.id);
        }

        let first = get_json_body(get(&app, "/api/resources?city=Springfield&page=1").await).await;
        let second = get_json_body(get(&app, "/api/resources?city=Springfield&page=2").await).await;
        let third = get_json_body(get(&app, "/api/resources?city=Springfield&page=3").await).await;

        assert_eq!(ids(&first), seeded[0..4].to_vec());
        assert_eq!(ids(&second), seeded[4..6].to_vec());
        assert!(ids(&third).is_empty());
        assert_eq!(third["data"]["totalRes"], 6);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_page_means_first_page() {
        let app = make_test_app().await;
        let only = seed_resource(&app, "Only", "Springfield", &[]).await;

        for page in ["0", "-2", "abc"] {
            let json = get_json_body(
                get(&app, &format!("/api/resources?city=Springfield&page={page}")).await,
            )
            .await;
            assert_eq!(ids(&json), vec![only.id]);
        }
    }

    #[tokio::test]
    #[serial]
    async fn search_without_city_covers_every_city() {
        let app = make_test_app().await;
        seed_resource(&app, "One", "Springfield", &[]).await;
        seed_resource(&app, "Two", "Shelbyville", &[]).await;

        let json = get_json_body(get(&app, "/api/resources").await).await;
        assert_eq!(json["data"]["totalRes"], 2);

        let json = get_json_body(get(&app, "/api/resources?city=").await).await;
        assert_eq!(json["data"]["totalRes"], 2);
    }

    #[tokio::test]
    #[serial]
    async fn search_unknown_city_is_empty() {
        let app = make_test_app().await;
        seed_resource(&app, "One", "Springfield", &["food"]).await;

        let json = get_json_body(get(&app, "/api/resources?city=Capital%20City").await).await;
        assert_eq!(json["data"]["totalRes"], 0);
        assert!(ids(&json).is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn picker_lists_titles_and_ids() {
        let app = make_test_app().await;
        let one = seed_resource(&app, "One", "Springfield", &[]).await;
        let two = seed_resource(&app, "Two", "Shelbyville", &[]).await;

        let json = get_json_body(get(&app, "/api/resources/picker").await).await;
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], one.id);
        assert_eq!(data[0]["title"], "One");
        assert_eq!(data[1]["id"], two.id);
    }

    #[tokio::test]
    #[serial]
    async fn get_resource_returns_details() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &["food"]).await;

        let response = get(&app, &format!("/api/resources/{}", resource.id)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["title"], "Mission");
        assert_eq!(json["data"]["city"], "Springfield");
        assert_eq!(json["data"]["services"]["food"], "yes");
        assert_eq!(
            json["data"]["imageUrl"],
            format!("/api/resources/{}/image", resource.id)
        );
    }

    #[tokio::test]
    #[serial]
    async fn get_missing_resource_is_404() {
        let app = make_test_app().await;

        let response = get(&app, "/api/resources/9999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Resource not found");
    }

    #[tokio::test]
    #[serial]
    async fn image_is_streamed_with_content_type() {
        let app = make_test_app().await;
        let resource = seed_resource(&app, "Mission", "Springfield", &[]).await;

        let response = get(&app, &format!("/api/resources/{}/image", resource.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "image/png");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], PNG_BYTES);
    }

    #[tokio::test]
    #[serial]
    async fn image_of_missing_resource_is_404() {
        let app = make_test_app().await;

        let response = get(&app, "/api/resources/9999/image").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
