use sqlx::SqlitePool;

use crate::{
    data_formats::truncate_chars,
    errors::RequestError,
    models::{Comment, NotificationKind},
};

use super::{insert_notification, new_id, NewNotification};

// $1 is the viewer (NULL for anonymous requests).
const COMMENT_QUERY: &str = r#"
    SELECT c.id                                        AS "id",
           c.post_id                                   AS "post_id",
           p.author_id                                 AS "post_author_id",
           c.author_id                                 AS "author_id",
           u.name                                      AS "author_name",
           u.avatar                                    AS "author_avatar",
           c.content                                   AS "content",
           c.parent_id                                 AS "parent_id",
           c.reply_to_name                             AS "reply_to_name",
           c.created_at                                AS "created_at",
           (SELECT COUNT(*)
            FROM   likes
            WHERE  likes.target_type = 'comment'
                   AND likes.target_id = c.id)         AS "likes",
           EXISTS (SELECT 1
                   FROM   likes
                   WHERE  likes.target_type = 'comment'
                          AND likes.target_id = c.id
                          AND likes.user_id = $1)      AS "is_liked"
    FROM   comments c
           INNER JOIN users u
                   ON c.author_id = u.id
           INNER JOIN posts p
                   ON c.post_id = p.id
"#;

const COMMENT_PREVIEW_CHARS: usize = 30;

pub struct NewComment {
    pub content: String,
    pub parent_id: Option<String>,
    pub reply_to_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ParentComment {
    id: String,
    post_id: String,
    parent_id: Option<String>,
    author_id: String,
    author_name: String,
}

/// All comments of a post, oldest first.
pub async fn list_comments_in_db(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    post_id: &str,
) -> Result<Vec<Comment>, RequestError> {
    let query =
        format!("{COMMENT_QUERY} WHERE c.post_id = $2 ORDER BY c.created_at ASC, c.rowid ASC");
    let result = sqlx::query_as::<_, Comment>(&query)
        .bind(viewer_id)
        .bind(post_id)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn get_comment_in_db(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    comment_id: &str,
) -> Result<Option<Comment>, RequestError> {
    let query = format!("{COMMENT_QUERY} WHERE c.id = $2");
    let result = sqlx::query_as::<_, Comment>(&query)
        .bind(viewer_id)
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Inserts a comment and fans it out to the post author and, for replies, to
/// the author of the comment being answered. Replies to replies are attached
/// to the top-level comment so threads stay one level deep.
pub async fn create_comment_in_db(
    pool: &SqlitePool,
    author_id: &str,
    post_id: &str,
    NewComment {
        content,
        parent_id,
        mut reply_to_name,
    }: NewComment,
) -> Result<Comment, RequestError> {
    let mut tx = pool.begin().await?;
    let post_author_id =
        sqlx::query_scalar::<_, String>("SELECT author_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&mut tx)
            .await?
            .ok_or(RequestError::NotFound("Post not found"))?;

    let parent = match parent_id {
        Some(parent_id) => {
            let parent = sqlx::query_as::<_, ParentComment>(
                r#"
                SELECT c.id, c.post_id, c.parent_id, c.author_id, u.name AS "author_name"
                FROM comments c INNER JOIN users u ON c.author_id = u.id
                WHERE c.id = $1
                "#,
            )
            .bind(parent_id.as_str())
            .fetch_optional(&mut tx)
            .await?
            .ok_or(RequestError::BadRequest("Parent comment not found"))?;
            if parent.post_id != post_id {
                return Err(RequestError::BadRequest(
                    "Parent comment belongs to another post",
                ));
            }
            Some(parent)
        }
        None => None,
    };

    let thread_id = parent
        .as_ref()
        .map(|parent| parent.parent_id.clone().unwrap_or_else(|| parent.id.clone()));
    if let Some(parent) = parent.as_ref().filter(|parent| parent.parent_id.is_some()) {
        reply_to_name.get_or_insert_with(|| parent.author_name.clone());
    }

    let comment_id = new_id();
    sqlx::query(
        r#"
        INSERT INTO comments (id, post_id, author_id, content, parent_id, reply_to_name)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(comment_id.as_str())
    .bind(post_id)
    .bind(author_id)
    .bind(content.as_str())
    .bind(thread_id)
    .bind(reply_to_name)
    .execute(&mut tx)
    .await?;

    let preview = truncate_chars(&content, COMMENT_PREVIEW_CHARS);
    insert_notification(
        &mut tx,
        NewNotification {
            user_id: &post_author_id,
            kind: NotificationKind::Comment,
            sender_id: author_id,
            content: format!("commented on your post: {preview}"),
            related_id: Some(post_id),
            comment_id: Some(&comment_id),
        },
    )
    .await?;
    if let Some(parent) = parent.filter(|parent| parent.author_id != post_author_id) {
        insert_notification(
            &mut tx,
            NewNotification {
                user_id: &parent.author_id,
                kind: NotificationKind::Comment,
                sender_id: author_id,
                content: format!("replied to your comment: {preview}"),
                related_id: Some(post_id),
                comment_id: Some(&comment_id),
            },
        )
        .await?;
    }
    tx.commit().await?;

    get_comment_in_db(pool, Some(author_id), &comment_id)
        .await?
        .ok_or(RequestError::ServerError)
}

async fn ensure_comment_author(
    pool: &SqlitePool,
    user_id: &str,
    comment_id: &str,
    forbidden: &'static str,
) -> Result<(), RequestError> {
    let author_id = sqlx::query_scalar::<_, String>("SELECT author_id FROM comments WHERE id = $1")
        .bind(comment_id)
        .fetch_optional(pool)
        .await?;
    match author_id {
        None => Err(RequestError::NotFound("Comment not found")),
        Some(author_id) if author_id != user_id => Err(RequestError::Forbidden(forbidden)),
        Some(_) => Ok(()),
    }
}

pub async fn update_comment_in_db(
    pool: &SqlitePool,
    user_id: &str,
    comment_id: &str,
    content: String,
) -> Result<Comment, RequestError> {
    ensure_comment_author(pool, user_id, comment_id, "Unauthorized to update this comment")
        .await?;
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE comments SET content = $1 WHERE id = $2 AND author_id = $3")
        .bind(content)
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;

    get_comment_in_db(pool, Some(user_id), comment_id)
        .await?
        .ok_or(RequestError::NotFound("Comment not found"))
}

/// Deletes the comment and its replies along with their likes and notifications.
pub async fn delete_comment_in_db(
    pool: &SqlitePool,
    user_id: &str,
    comment_id: &str,
) -> Result<(), RequestError> {
    ensure_comment_author(pool, user_id, comment_id, "Unauthorized to delete this comment")
        .await?;
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        DELETE FROM likes
        WHERE target_type = 'comment'
          AND target_id IN (SELECT id FROM comments WHERE id = $1 OR parent_id = $1)
        "#,
    )
    .bind(comment_id)
    .execute(&mut tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM notifications
        WHERE comment_id IN (SELECT id FROM comments WHERE id = $1 OR parent_id = $1)
        "#,
    )
    .bind(comment_id)
    .execute(&mut tx)
    .await?;

    sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
        .bind(comment_id)
        .bind(user_id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
