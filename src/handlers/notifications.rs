use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::AuthUser,
    data_formats::{MessageWrapper, NotificationResponse, UnreadCountWrapper},
    db_helpers::{
        count_unread_notifications_in_db, list_notifications_in_db,
        mark_all_notifications_read_in_db, mark_notification_read_in_db,
    },
    extractors::PathParam,
};

use super::JsonResult;

// ----------------- Notification Handlers -----------------
pub async fn list_notifications(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<Vec<NotificationResponse>> {
    let notifications = list_notifications_in_db(&pool, &user.id).await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

pub async fn unread_notification_count(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<UnreadCountWrapper> {
    let count = count_unread_notifications_in_db(&pool, &user.id).await?;
    Ok(Json(UnreadCountWrapper { count }))
}

pub async fn mark_notification_read(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    mark_notification_read_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Notification marked as read")))
}

pub async fn mark_all_notifications_read(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<MessageWrapper> {
    let updated = mark_all_notifications_read_in_db(&pool, &user.id).await?;
    tracing::debug!(user_id = %user.id, updated, "notifications marked read");
    Ok(Json(MessageWrapper::new("All notifications marked as read")))
}
