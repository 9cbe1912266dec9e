use sqlx::SqlitePool;

use crate::{errors::RequestError, models::CartItem};

use super::get_product_in_db;

pub(super) const CART_QUERY: &str = r#"
    SELECT ci.id       AS "id",
           ci.product_id AS "product_id",
           p.name      AS "product_name",
           p.image     AS "product_image",
           p.price     AS "price",
           ci.quantity AS "quantity",
           ci.spec     AS "spec"
    FROM   cart_items ci
           INNER JOIN products p
                   ON ci.product_id = p.id
    WHERE  ci.user_id = $1
    ORDER  BY ci.created_at DESC, ci.id DESC
"#;

/// Lines of the user's cart, priced from the current product rows.
pub async fn get_cart_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<CartItem>, RequestError> {
    let result = sqlx::query_as::<_, CartItem>(CART_QUERY)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

/// Adds `quantity` of a product variant, merging with an existing line.
/// A merge that would push the line above `max_quantity` is rejected.
pub async fn add_cart_item_in_db(
    pool: &SqlitePool,
    user_id: &str,
    product_id: &str,
    quantity: i64,
    max_quantity: i64,
    spec: Option<String>,
) -> Result<(), RequestError> {
    if get_product_in_db(pool, product_id).await?.is_none() {
        return Err(RequestError::NotFound("Product not found"));
    }
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        r#"
        INSERT INTO cart_items (user_id, product_id, quantity, spec)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, product_id, spec) DO UPDATE
        SET    quantity = quantity + excluded.quantity
        WHERE  quantity + excluded.quantity <= $5
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(spec.unwrap_or_default())
    .bind(max_quantity)
    .execute(&mut tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::BadRequest("Quantity cannot exceed 999"));
    }
    tx.commit().await?;
    Ok(())
}

pub async fn update_cart_item_in_db(
    pool: &SqlitePool,
    user_id: &str,
    item_id: i64,
    quantity: i64,
) -> Result<(), RequestError> {
    let result =
        sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3")
            .bind(quantity)
            .bind(item_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Cart item not found"));
    }
    Ok(())
}

pub async fn remove_cart_item_in_db(
    pool: &SqlitePool,
    user_id: &str,
    item_id: i64,
) -> Result<(), RequestError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Cart item not found"));
    }
    Ok(())
}

pub async fn clear_cart_in_db(pool: &SqlitePool, user_id: &str) -> Result<u64, RequestError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
