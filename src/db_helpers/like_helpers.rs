use sqlx::SqlitePool;

use crate::{
    errors::RequestError,
    models::{LikeTarget, NotificationKind},
};

use super::{insert_notification, NewNotification};

async fn insert_like(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: &str,
    target: LikeTarget,
    target_id: &str,
    duplicate: &'static str,
) -> Result<(), RequestError> {
    sqlx::query(
        r#"
        INSERT INTO likes (user_id, target_type, target_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(target.as_str())
    .bind(target_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| RequestError::from(e).on_unique_violation(duplicate))?;
    Ok(())
}

pub async fn like_post_in_db(
    pool: &SqlitePool,
    user_id: &str,
    post_id: &str,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let author_id = sqlx::query_scalar::<_, String>("SELECT author_id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?
        .ok_or(RequestError::NotFound("Post not found"))?;

    insert_like(&mut tx, user_id, LikeTarget::Post, post_id, "Already liked this post").await?;
    insert_notification(
        &mut tx,
        NewNotification {
            user_id: &author_id,
            kind: NotificationKind::Like,
            sender_id: user_id,
            content: "liked your post".to_string(),
            related_id: Some(post_id),
            comment_id: None,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn like_comment_in_db(
    pool: &SqlitePool,
    user_id: &str,
    comment_id: &str,
) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let (author_id, post_id) = sqlx::query_as::<_, (String, String)>(
        "SELECT author_id, post_id FROM comments WHERE id = $1",
    )
    .bind(comment_id)
    .fetch_optional(&mut tx)
    .await?
    .ok_or(RequestError::NotFound("Comment not found"))?;

    insert_like(
        &mut tx,
        user_id,
        LikeTarget::Comment,
        comment_id,
        "Already liked this comment",
    )
    .await?;
    insert_notification(
        &mut tx,
        NewNotification {
            user_id: &author_id,
            kind: NotificationKind::Like,
            sender_id: user_id,
            content: "liked your comment".to_string(),
            related_id: Some(&post_id),
            comment_id: Some(comment_id),
        },
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn unlike_in_db(
    pool: &SqlitePool,
    user_id: &str,
    target: LikeTarget,
    target_id: &str,
) -> Result<(), RequestError> {
    let result = sqlx::query(
        "DELETE FROM likes WHERE user_id = $1 AND target_type = $2 AND target_id = $3",
    )
    .bind(user_id)
    .bind(target.as_str())
    .bind(target_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Like not found"));
    }
    Ok(())
}
