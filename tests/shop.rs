mod common;

use common::{body, error, TestApp};
use outdog::{CartItemResponse, OrderCreatedWrapper, OrderResponse, ProductResponse};
use reqwest::StatusCode;
use serde_json::json;

async fn add_to_cart(
    app: &TestApp,
    token: &str,
    product_id: &str,
    quantity: i64,
    spec: Option<&str>,
) {
    let response = app
        .post(
            "/api/cart/items",
            Some(token),
            &json!({ "productId": product_id, "quantity": quantity, "spec": spec }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn place_order(app: &TestApp, token: &str) -> OrderCreatedWrapper {
    let response = app.post("/api/orders", Some(token), &json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body(response).await
}

#[tokio::test]
async fn catalogue_is_seeded() {
    let app = TestApp::spawn().await;
    let products: Vec<ProductResponse> = body(app.get("/api/products", None).await).await;
    assert_eq!(products.len(), 3);

    let headlamp: ProductResponse = body(app.get("/api/products/headlamp-1", None).await).await;
    assert_eq!(headlamp.price, 89.5);
    assert_eq!(headlamp.original_price, Some(129.0));

    let missing = app.get("/api/products/nope", None).await;
    assert_eq!(error(missing, StatusCode::NOT_FOUND).await, "Product not found");
}

#[tokio::test]
async fn cart_lines_merge_per_variant() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    add_to_cart(&app, &alice.token, "tool-set-1", 1, None).await;
    add_to_cart(&app, &alice.token, "tool-set-1", 2, None).await;
    add_to_cart(&app, &alice.token, "work-gloves-1", 1, Some("L")).await;
    add_to_cart(&app, &alice.token, "work-gloves-1", 1, Some("M")).await;

    let cart: Vec<CartItemResponse> = body(app.get("/api/cart", Some(&alice.token)).await).await;
    assert_eq!(cart.len(), 3);
    let tools = cart
        .iter()
        .find(|item| item.product_id == "tool-set-1")
        .expect("tool line");
    assert_eq!(tools.quantity, 3);
    assert_eq!(tools.spec, None);
    assert_eq!(tools.price, 299.0);

    let bad_quantity = app
        .post(
            "/api/cart/items",
            Some(&alice.token),
            &json!({ "productId": "tool-set-1", "quantity": 0 }),
        )
        .await;
    assert_eq!(bad_quantity.status(), StatusCode::BAD_REQUEST);
    let unknown = app
        .post(
            "/api/cart/items",
            Some(&alice.token),
            &json!({ "productId": "nope" }),
        )
        .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let item_path = format!("/api/cart/items/{}", tools.id);
    let bob = app.register("bob").await;
    assert_eq!(
        app.put(&item_path, Some(&bob.token), &json!({ "quantity": 5 }))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.put(&item_path, Some(&alice.token), &json!({ "quantity": 5 }))
            .await
            .status(),
        StatusCode::OK
    );
    assert_eq!(
        app.delete(&item_path, Some(&alice.token)).await.status(),
        StatusCode::OK
    );
    let cart: Vec<CartItemResponse> = body(app.get("/api/cart", Some(&alice.token)).await).await;
    assert_eq!(cart.len(), 2);

    assert_eq!(
        app.delete("/api/cart", Some(&alice.token)).await.status(),
        StatusCode::OK
    );
    let cart: Vec<CartItemResponse> = body(app.get("/api/cart", Some(&alice.token)).await).await;
    assert!(cart.is_empty());
}

#[tokio::test]
async fn checkout_snapshots_cart_and_totals() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let empty = app.post("/api/orders", Some(&alice.token), &json!({})).await;
    assert_eq!(error(empty, StatusCode::BAD_REQUEST).await, "Cart is empty");

    add_to_cart(&app, &alice.token, "tool-set-1", 2, None).await;
    add_to_cart(&app, &alice.token, "headlamp-1", 1, Some("red")).await;
    let created = place_order(&app, &alice.token).await;
    assert!(created.order_id.starts_with("ORD-"));
    assert_eq!(created.total_amount, 687.5);

    let cart: Vec<CartItemResponse> = body(app.get("/api/cart", Some(&alice.token)).await).await;
    assert!(cart.is_empty());

    let order: OrderResponse = body(
        app.get(&format!("/api/orders/{}", created.order_id), Some(&alice.token))
            .await,
    )
    .await;
    assert_eq!(order.status, "pending");
    assert_eq!(order.items.len(), 2);
    let line_total: f64 = order
        .items
        .iter()
        .map(|item| item.price * item.quantity as f64)
        .sum();
    assert_eq!(line_total, order.total_amount);
    assert!(order
        .items
        .iter()
        .any(|item| item.spec.as_deref() == Some("red")));
    assert!(order.review.is_none());

    let orders: Vec<OrderResponse> = body(app.get("/api/orders", Some(&alice.token)).await).await;
    assert_eq!(orders.len(), 1);

    let bob = app.register("bob").await;
    let foreign = app
        .get(&format!("/api/orders/{}", created.order_id), Some(&bob.token))
        .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_status_flow_and_review() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    add_to_cart(&app, &alice.token, "work-gloves-1", 1, None).await;
    let created = place_order(&app, &alice.token).await;
    let status_path = format!("/api/orders/{}/status", created.order_id);
    let review_path = format!("/api/orders/{}/review", created.order_id);

    let invalid = app
        .put(&status_path, Some(&alice.token), &json!({ "status": "lost" }))
        .await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let early = app
        .post(&review_path, Some(&alice.token), &json!({ "rating": 5 }))
        .await;
    assert_eq!(
        error(early, StatusCode::BAD_REQUEST).await,
        "Can only review delivered orders"
    );

    let shipped: OrderResponse = body(
        app.put(&status_path, Some(&alice.token), &json!({ "status": "shipped" }))
            .await,
    )
    .await;
    assert_eq!(shipped.status, "shipped");
    let tracking = shipped.tracking_number.expect("tracking number");
    assert!(tracking.starts_with("SF"));

    let delivered: OrderResponse = body(
        app.put(&status_path, Some(&alice.token), &json!({ "status": "delivered" }))
            .await,
    )
    .await;
    assert_eq!(delivered.tracking_number.as_deref(), Some(tracking.as_str()));

    let out_of_range = app
        .post(&review_path, Some(&alice.token), &json!({ "rating": 6 }))
        .await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);

    let review = app
        .post(
            &review_path,
            Some(&alice.token),
            &json!({ "rating": 4, "content": "warm", "tags": ["durable"] }),
        )
        .await;
    assert_eq!(review.status(), StatusCode::CREATED);
    let again = app
        .post(&review_path, Some(&alice.token), &json!({ "rating": 3 }))
        .await;
    assert_eq!(error(again, StatusCode::CONFLICT).await, "Order already reviewed");

    let order: OrderResponse = body(
        app.get(&format!("/api/orders/{}", created.order_id), Some(&alice.token))
            .await,
    )
    .await;
    let review = order.review.expect("review");
    assert_eq!(review.rating, 4);
    assert_eq!(review.tags, vec!["durable"]);

    let refunded: OrderResponse = body(
        app.put(
            &status_path,
            Some(&alice.token),
            &json!({ "status": "refunded", "reason": "torn seam" }),
        )
        .await,
    )
    .await;
    assert_eq!(refunded.refund_reason.as_deref(), Some("torn seam"));
}

#[tokio::test]
async fn cart_quantity_is_capped() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;

    let huge = app
        .post(
            "/api/cart/items",
            Some(&alice.token),
            &json!({ "productId": "tool-set-1", "quantity": i64::MAX }),
        )
        .await;
    assert_eq!(
        error(huge, StatusCode::BAD_REQUEST).await,
        "Quantity cannot exceed 999"
    );

    add_to_cart(&app, &alice.token, "tool-set-1", 600, None).await;
    let overflow = app
        .post(
            "/api/cart/items",
            Some(&alice.token),
            &json!({ "productId": "tool-set-1", "quantity": 600 }),
        )
        .await;
    assert_eq!(
        error(overflow, StatusCode::BAD_REQUEST).await,
        "Quantity cannot exceed 999"
    );

    let cart: Vec<CartItemResponse> = body(app.get("/api/cart", Some(&alice.token)).await).await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].quantity, 600);

    let item_path = format!("/api/cart/items/{}", cart[0].id);
    let too_many = app
        .put(&item_path, Some(&alice.token), &json!({ "quantity": 1000 }))
        .await;
    assert_eq!(too_many.status(), StatusCode::BAD_REQUEST);

    let created = place_order(&app, &alice.token).await;
    assert_eq!(created.total_amount, 600.0 * 299.0);
}
