use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    data_formats::ProductResponse,
    db_helpers::{get_product_in_db, list_products_in_db},
    errors::RequestError,
    extractors::PathParam,
};

use super::JsonResult;

pub async fn list_products(
    Extension(pool): Extension<Arc<SqlitePool>>,
) -> JsonResult<Vec<ProductResponse>> {
    let products = list_products_in_db(&pool).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

pub async fn get_product(
    Extension(pool): Extension<Arc<SqlitePool>>,
    PathParam(id): PathParam<String>,
) -> JsonResult<ProductResponse> {
    let product = get_product_in_db(&pool, &id)
        .await?
        .ok_or(RequestError::NotFound("Product not found"))?;
    Ok(Json(product.into()))
}
