use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::AuthUser,
    data_formats::{
        required, AddCartItemRequest, CartItemResponse, MessageWrapper, UpdateCartItemRequest,
    },
    db_helpers::{
        add_cart_item_in_db, clear_cart_in_db, get_cart_in_db, remove_cart_item_in_db,
        update_cart_item_in_db,
    },
    errors::RequestError,
    extractors::{JsonBody, PathParam},
};

use super::JsonResult;

const MAX_CART_QUANTITY: i64 = 999;

fn check_quantity(quantity: i64) -> Result<(), RequestError> {
    if quantity < 1 {
        return Err(RequestError::BadRequest("Quantity must be at least 1"));
    }
    if quantity > MAX_CART_QUANTITY {
        return Err(RequestError::BadRequest("Quantity cannot exceed 999"));
    }
    Ok(())
}

// ----------------- Cart Handlers -----------------
pub async fn get_cart(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<Vec<CartItemResponse>> {
    let items = get_cart_in_db(&pool, &user.id).await?;
    Ok(Json(items.into_iter().map(CartItemResponse::from).collect()))
}

pub async fn add_cart_item(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    JsonBody(request): JsonBody<AddCartItemRequest>,
) -> JsonResult<MessageWrapper> {
    let product_id =
        required(request.product_id).ok_or(RequestError::BadRequest("Product ID is required"))?;
    check_quantity(request.quantity)?;
    add_cart_item_in_db(
        &pool,
        &user.id,
        &product_id,
        request.quantity,
        MAX_CART_QUANTITY,
        required(request.spec),
    )
    .await?;
    Ok(Json(MessageWrapper::new("Item added to cart")))
}

pub async fn update_cart_item(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateCartItemRequest>,
) -> JsonResult<MessageWrapper> {
    check_quantity(request.quantity)?;
    update_cart_item_in_db(&pool, &user.id, id, request.quantity).await?;
    Ok(Json(MessageWrapper::new("Cart item updated")))
}

pub async fn remove_cart_item(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<i64>,
) -> JsonResult<MessageWrapper> {
    remove_cart_item_in_db(&pool, &user.id, id).await?;
    Ok(Json(MessageWrapper::new("Item removed from cart")))
}

pub async fn clear_cart(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<MessageWrapper> {
    let removed = clear_cart_in_db(&pool, &user.id).await?;
    tracing::debug!(user_id = %user.id, removed, "cart cleared");
    Ok(Json(MessageWrapper::new("Cart cleared")))
}
