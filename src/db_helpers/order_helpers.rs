use rand::Rng;
use sqlx::SqlitePool;

use crate::{
    data_formats::to_json_list,
    errors::RequestError,
    models::{CartItem, Order, OrderItem, OrderReview, OrderStatus},
};

use super::{cart_helpers::CART_QUERY, new_id};

const ORDER_COLUMNS: &str =
    "id, user_id, total_amount, status, tracking_number, refund_reason, created_at";

pub type OrderWithDetails = (Order, Vec<OrderItem>, Option<OrderReview>);

pub struct NewReview {
    pub rating: i64,
    pub content: String,
    pub tags: Vec<String>,
}

/// Sum of price × quantity, rounded to cents.
pub fn order_total(items: &[CartItem]) -> f64 {
    let total: f64 = items
        .iter()
        .map(|item| item.price * item.quantity as f64)
        .sum();
    (total * 100.0).round() / 100.0
}

fn new_order_id() -> String {
    let suffix: String = new_id().chars().take(8).collect();
    format!("ORD-{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}

fn new_tracking_number() -> String {
    let digits: u64 = rand::thread_rng().gen_range(100_000_000_000..1_000_000_000_000);
    format!("SF{digits}")
}

/// Turns the user's cart into an order and empties the cart in one transaction.
/// Returns the new order id and its total.
pub async fn create_order_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<(String, f64), RequestError> {
    let mut tx = pool.begin().await?;
    let cart = sqlx::query_as::<_, CartItem>(CART_QUERY)
        .bind(user_id)
        .fetch_all(&mut tx)
        .await?;
    if cart.is_empty() {
        return Err(RequestError::BadRequest("Cart is empty"));
    }

    let order_id = new_order_id();
    let total_amount = order_total(&cart);
    sqlx::query(
        r#"
        INSERT INTO orders (id, user_id, total_amount, status)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(order_id.as_str())
    .bind(user_id)
    .bind(total_amount)
    .bind(OrderStatus::Pending.as_str())
    .execute(&mut tx)
    .await?;

    for item in cart {
        sqlx::query(
            r#"
            INSERT INTO order_items
                (order_id, product_id, product_name, product_image, price, quantity, spec)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(order_id.as_str())
        .bind(item.product_id)
        .bind(item.product_name)
        .bind(item.product_image)
        .bind(item.price)
        .bind(item.quantity)
        .bind(Some(item.spec).filter(|spec| !spec.is_empty()))
        .execute(&mut tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;

    tracing::info!(order_id = %order_id, total_amount, "order created");
    Ok((order_id, total_amount))
}

async fn load_order_details(
    pool: &SqlitePool,
    order: Order,
) -> Result<OrderWithDetails, RequestError> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT id, order_id, product_id, product_name, product_image, price, quantity, spec
        FROM order_items WHERE order_id = $1 ORDER BY id
        "#,
    )
    .bind(order.id.as_str())
    .fetch_all(pool)
    .await?;
    let review = sqlx::query_as::<_, OrderReview>(
        r#"
        SELECT id, order_id, rating, content, tags, created_at
        FROM order_reviews WHERE order_id = $1
        "#,
    )
    .bind(order.id.as_str())
    .fetch_optional(pool)
    .await?;
    Ok((order, items, review))
}

async fn get_order_row(
    pool: &SqlitePool,
    user_id: &str,
    order_id: &str,
) -> Result<Order, RequestError> {
    let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2");
    sqlx::query_as::<_, Order>(&query)
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(RequestError::NotFound("Order not found"))
}

pub async fn list_orders_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<OrderWithDetails>, RequestError> {
    let query = format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC"
    );
    let orders = sqlx::query_as::<_, Order>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        result.push(load_order_details(pool, order).await?);
    }
    Ok(result)
}

pub async fn get_order_in_db(
    pool: &SqlitePool,
    user_id: &str,
    order_id: &str,
) -> Result<OrderWithDetails, RequestError> {
    let order = get_order_row(pool, user_id, order_id).await?;
    load_order_details(pool, order).await
}

/// Shipping assigns a tracking number once; refunding records the reason if given.
pub async fn update_order_status_in_db(
    pool: &SqlitePool,
    user_id: &str,
    order_id: &str,
    status: OrderStatus,
    reason: Option<String>,
) -> Result<OrderWithDetails, RequestError> {
    get_order_row(pool, user_id, order_id).await?;

    let tracking_number = (status == OrderStatus::Shipped).then(new_tracking_number);
    let refund_reason = reason.filter(|_| status == OrderStatus::Refunded);

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE orders
        SET status = $1,
            tracking_number = COALESCE(tracking_number, $2),
            refund_reason = COALESCE($3, refund_reason)
        WHERE id = $4 AND user_id = $5
        "#,
    )
    .bind(status.as_str())
    .bind(tracking_number)
    .bind(refund_reason)
    .bind(order_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;

    get_order_in_db(pool, user_id, order_id).await
}

pub async fn add_order_review_in_db(
    pool: &SqlitePool,
    user_id: &str,
    order_id: &str,
    review: NewReview,
) -> Result<(), RequestError> {
    let order = get_order_row(pool, user_id, order_id).await?;
    if order.status != OrderStatus::Delivered.as_str() {
        return Err(RequestError::BadRequest("Can only review delivered orders"));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO order_reviews (order_id, rating, content, tags)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(order_id)
    .bind(review.rating)
    .bind(review.content)
    .bind(to_json_list(&review.tags))
    .execute(&mut tx)
    .await
    .map_err(|e| RequestError::from(e).on_unique_violation("Order already reviewed"))?;
    tx.commit().await?;
    Ok(())
}
