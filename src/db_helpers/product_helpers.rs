use sqlx::SqlitePool;

use crate::{errors::RequestError, models::Product};

const PRODUCT_COLUMNS: &str = r#"
    id, name, description, price, original_price, image, badge,
    specs, features, detail_images, created_at
"#;

pub async fn list_products_in_db(pool: &SqlitePool) -> Result<Vec<Product>, RequestError> {
    let query =
        format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, rowid DESC");
    let result = sqlx::query_as::<_, Product>(&query).fetch_all(pool).await?;
    Ok(result)
}

pub async fn get_product_in_db(
    pool: &SqlitePool,
    product_id: &str,
) -> Result<Option<Product>, RequestError> {
    let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    let result = sqlx::query_as::<_, Product>(&query)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn search_products_in_db(
    pool: &SqlitePool,
    term: &str,
    limit: i64,
) -> Result<Vec<Product>, RequestError> {
    let query = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE name LIKE $1 OR description LIKE $1 ORDER BY name LIMIT $2"
    );
    let result = sqlx::query_as::<_, Product>(&query)
        .bind(format!("%{term}%"))
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(result)
}
