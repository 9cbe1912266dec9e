use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::AuthUser,
    data_formats::{
        MessageWrapper, OrderCreatedWrapper, OrderResponse, OrderReviewRequest,
        UpdateOrderStatusRequest,
    },
    db_helpers::{
        add_order_review_in_db, create_order_in_db, get_order_in_db, list_orders_in_db,
        update_order_status_in_db, NewReview,
    },
    errors::RequestError,
    extractors::{JsonBody, PathParam},
    models::OrderStatus,
    JsonResponse,
};

use super::JsonResult;

// ----------------- Order Handlers -----------------
pub async fn list_orders(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<Vec<OrderResponse>> {
    let orders = list_orders_in_db(&pool, &user.id).await?;
    Ok(Json(
        orders
            .into_iter()
            .map(|(order, items, review)| OrderResponse::new(order, items, review))
            .collect(),
    ))
}

pub async fn get_order(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<OrderResponse> {
    let (order, items, review) = get_order_in_db(&pool, &user.id, &id).await?;
    Ok(Json(OrderResponse::new(order, items, review)))
}

pub async fn create_order(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> Result<JsonResponse<OrderCreatedWrapper>, RequestError> {
    let (order_id, total_amount) = create_order_in_db(&pool, &user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedWrapper {
            order_id,
            total_amount,
            message: "Order created successfully".to_string(),
        }),
    ))
}

pub async fn update_order_status(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
    JsonBody(request): JsonBody<UpdateOrderStatusRequest>,
) -> JsonResult<OrderResponse> {
    let status: OrderStatus = request
        .status
        .trim()
        .parse()
        .map_err(|_| RequestError::BadRequest("Invalid order status"))?;
    let (order, items, review) =
        update_order_status_in_db(&pool, &user.id, &id, status, request.reason).await?;
    tracing::info!(order_id = %order.id, status = status.as_str(), "order status changed");
    Ok(Json(OrderResponse::new(order, items, review)))
}

pub async fn review_order(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
    JsonBody(request): JsonBody<OrderReviewRequest>,
) -> Result<JsonResponse<MessageWrapper>, RequestError> {
    let rating = request
        .rating
        .filter(|rating| (1..=5).contains(rating))
        .ok_or(RequestError::BadRequest("Rating must be between 1 and 5"))?;
    add_order_review_in_db(
        &pool,
        &user.id,
        &id,
        NewReview {
            rating,
            content: request.content.unwrap_or_default(),
            tags: request.tags,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageWrapper::new("Review submitted successfully")),
    ))
}
