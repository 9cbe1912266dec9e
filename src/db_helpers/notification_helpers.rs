use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::{
    errors::RequestError,
    models::{Notification, NotificationKind},
};

use super::new_id;

const NOTIFICATION_QUERY: &str = r#"
    SELECT n.id,
           n.user_id,
           n.type,
           n.sender_id,
           u.name   AS "sender_name",
           u.avatar AS "sender_avatar",
           n.content,
           n.related_id,
           n.comment_id,
           n.is_read,
           n.created_at
    FROM   notifications n
           LEFT JOIN users u ON n.sender_id = u.id
    WHERE  n.user_id = $1
    ORDER  BY n.created_at DESC, n.rowid DESC
    LIMIT  $2
"#;

pub const NOTIFICATION_PAGE_SIZE: i64 = 50;

pub struct NewNotification<'a> {
    pub user_id: &'a str,
    pub kind: NotificationKind,
    pub sender_id: &'a str,
    pub content: String,
    pub related_id: Option<&'a str>,
    pub comment_id: Option<&'a str>,
}

/// Records a notification inside the caller's transaction.
/// Actions a user takes on their own content never notify them.
pub async fn insert_notification(
    tx: &mut Transaction<'_, Sqlite>,
    notification: NewNotification<'_>,
) -> Result<(), RequestError> {
    if notification.user_id == notification.sender_id {
        return Ok(());
    }
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, type, sender_id, content, related_id, comment_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(new_id())
    .bind(notification.user_id)
    .bind(notification.kind.as_str())
    .bind(notification.sender_id)
    .bind(notification.content)
    .bind(notification.related_id)
    .bind(notification.comment_id)
    .execute(&mut *tx)
    .await?;
    tracing::debug!(
        recipient = notification.user_id,
        kind = notification.kind.as_str(),
        "notification recorded"
    );
    Ok(())
}

pub async fn list_notifications_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Notification>, RequestError> {
    let result = sqlx::query_as::<_, Notification>(NOTIFICATION_QUERY)
        .bind(user_id)
        .bind(NOTIFICATION_PAGE_SIZE)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn count_unread_notifications_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn mark_notification_read_in_db(
    pool: &SqlitePool,
    user_id: &str,
    notification_id: &str,
) -> Result<(), RequestError> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = $1 AND user_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Notification not found"));
    }
    Ok(())
}

pub async fn mark_all_notifications_read_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<u64, RequestError> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = $1 AND is_read = 0")
            .bind(user_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}
