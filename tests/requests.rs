mod common;

use common::{error, TestApp};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn malformed_json_body_is_a_json_400() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let broken = app
        .post_raw("/api/posts", Some(&alice.token), "{not json")
        .await;
    assert_eq!(
        error(broken, StatusCode::BAD_REQUEST).await,
        "Invalid JSON body"
    );

    let no_content_type = app
        .client
        .post(app.url("/api/auth/login"))
        .body(r#"{"name":"alice"}"#)
        .send()
        .await
        .expect("request failed");
    assert_eq!(
        error(no_content_type, StatusCode::BAD_REQUEST).await,
        "Invalid JSON body"
    );
}

#[tokio::test]
async fn mistyped_fields_are_a_json_400() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let wrong_type = app
        .post(
            "/api/cart/items",
            Some(&alice.token),
            &json!({ "productId": "tool-set-1", "quantity": "two" }),
        )
        .await;
    assert_eq!(
        error(wrong_type, StatusCode::BAD_REQUEST).await,
        "Invalid JSON body"
    );

    let wrong_rating = app
        .post(
            "/api/orders/ORD-1/review",
            Some(&alice.token),
            &json!({ "rating": "five" }),
        )
        .await;
    assert_eq!(wrong_rating.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_path_and_query_values_are_a_json_400() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let not_a_number = app.delete("/api/cart/items/abc", Some(&alice.token)).await;
    assert_eq!(
        error(not_a_number, StatusCode::BAD_REQUEST).await,
        "Invalid path parameter"
    );

    let negative_page = app.get("/api/posts?page=-1", None).await;
    assert_eq!(
        error(negative_page, StatusCode::BAD_REQUEST).await,
        "Invalid query parameters"
    );
    let user_posts = app
        .get(
            &format!("/api/users/{}/posts?limit=many", alice.user_id),
            None,
        )
        .await;
    assert_eq!(user_posts.status(), StatusCode::BAD_REQUEST);
}
