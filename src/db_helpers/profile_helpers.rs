use sqlx::SqlitePool;

use crate::{
    errors::RequestError,
    models::{NotificationKind, UserSummary},
};

use super::{get_user_by_id, insert_notification, NewNotification};

pub async fn follow_user_in_db(
    pool: &SqlitePool,
    follower_id: &str,
    following_id: &str,
) -> Result<(), RequestError> {
    if follower_id == following_id {
        return Err(RequestError::BadRequest("Cannot follow yourself"));
    }
    if get_user_by_id(pool, following_id).await?.is_none() {
        return Err(RequestError::NotFound("User not found"));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(&mut tx)
    .await
    .map_err(|e| RequestError::from(e).on_unique_violation("Already following this user"))?;

    insert_notification(
        &mut tx,
        NewNotification {
            user_id: following_id,
            kind: NotificationKind::Follow,
            sender_id: follower_id,
            content: "started following you".to_string(),
            related_id: Some(follower_id),
            comment_id: None,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn unfollow_user_in_db(
    pool: &SqlitePool,
    follower_id: &str,
    following_id: &str,
) -> Result<(), RequestError> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows WHERE follower_id = $1 AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Not following this user"));
    }
    Ok(())
}

pub async fn get_followers_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<UserSummary>, RequestError> {
    let result = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name, u.avatar, u.bio
        FROM users u
        INNER JOIN follows f ON u.id = f.follower_id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC, f.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}

pub async fn get_following_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<UserSummary>, RequestError> {
    let result = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name, u.avatar, u.bio
        FROM users u
        INNER JOIN follows f ON u.id = f.following_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC, f.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(result)
}
