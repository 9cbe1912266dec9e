use sqlx::SqlitePool;

use crate::data_formats::{to_json_list, PostQueryParams, UpdatePostRequest};
use crate::errors::RequestError;
use crate::models::Post;

use super::{new_id, QueryBuilder};

// $1 is the viewer (NULL for anonymous requests).
const POST_QUERY: &str = r#"
    SELECT p.id                                                AS "id",
           p.author_id                                         AS "author_id",
           u.name                                              AS "author_name",
           u.avatar                                            AS "author_avatar",
           p.title                                             AS "title",
           p.content                                           AS "content",
           p.images                                            AS "images",
           p.categories                                        AS "categories",
           p.is_pinned                                         AS "is_pinned",
           p.is_muted                                          AS "is_muted",
           p.created_at                                        AS "created_at",
           (SELECT COUNT(*)
            FROM   likes
            WHERE  likes.target_type = 'post'
                   AND likes.target_id = p.id)                 AS "likes",
           (SELECT COUNT(*)
            FROM   comments
            WHERE  comments.post_id = p.id)                    AS "comments",
           EXISTS (SELECT 1
                   FROM   likes
                   WHERE  likes.target_type = 'post'
                          AND likes.target_id = p.id
                          AND likes.user_id = $1)              AS "is_liked"
    FROM   posts p
           INNER JOIN users u
                   ON p.author_id = u.id
"#;

pub struct NewPost {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub categories: Vec<String>,
}

pub async fn list_posts_in_db(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    params: &PostQueryParams,
) -> Result<Vec<Post>, RequestError> {
    let (limit, offset) = params.limit_offset();
    let query = format!(
        r#"{POST_QUERY}
    WHERE  ( $2 IS NULL OR p.categories LIKE '%"' || $2 || '"%' )
           AND ( $3 IS NULL OR p.author_id = $3 )
    ORDER  BY p.is_pinned DESC, p.created_at DESC, p.rowid DESC
    LIMIT  $4 OFFSET $5"#
    );
    let result = sqlx::query_as::<_, Post>(&query)
        .bind(viewer_id)
        .bind(params.category.as_deref())
        .bind(params.author.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn search_posts_in_db(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    term: &str,
    limit: i64,
) -> Result<Vec<Post>, RequestError> {
    let query = format!(
        r#"{POST_QUERY}
    WHERE  p.title LIKE $2 OR p.content LIKE $2
    ORDER  BY p.created_at DESC, p.rowid DESC
    LIMIT  $3"#
    );
    let result = sqlx::query_as::<_, Post>(&query)
        .bind(viewer_id)
        .bind(format!("%{term}%"))
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn get_post_in_db(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    post_id: &str,
) -> Result<Option<Post>, RequestError> {
    let query = format!("{POST_QUERY} WHERE p.id = $2");
    let result = sqlx::query_as::<_, Post>(&query)
        .bind(viewer_id)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn get_post_author_in_db(
    pool: &SqlitePool,
    post_id: &str,
) -> Result<Option<String>, RequestError> {
    let author = sqlx::query_scalar::<_, String>("SELECT author_id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    Ok(author)
}

/// Fails with 404 when the post is gone and 403 when `user_id` is not its author.
async fn ensure_post_author(
    pool: &SqlitePool,
    user_id: &str,
    post_id: &str,
    forbidden: &'static str,
) -> Result<(), RequestError> {
    match get_post_author_in_db(pool, post_id).await? {
        None => Err(RequestError::NotFound("Post not found")),
        Some(author_id) if author_id != user_id => Err(RequestError::Forbidden(forbidden)),
        Some(_) => Ok(()),
    }
}

pub async fn create_post_in_db(
    pool: &SqlitePool,
    author_id: &str,
    post: NewPost,
) -> Result<Post, RequestError> {
    let post_id = new_id();
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO posts (id, author_id, title, content, images, categories)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(post_id.as_str())
    .bind(author_id)
    .bind(post.title)
    .bind(post.content)
    .bind(to_json_list(&post.images))
    .bind(to_json_list(&post.categories))
    .execute(&mut tx)
    .await?;
    tx.commit().await?;

    get_post_in_db(pool, Some(author_id), &post_id)
        .await?
        .ok_or(RequestError::ServerError)
}

pub async fn update_post_in_db(
    pool: &SqlitePool,
    user_id: &str,
    post_id: &str,
    UpdatePostRequest {
        title,
        content,
        images,
        categories,
    }: UpdatePostRequest,
) -> Result<Post, RequestError> {
    ensure_post_author(pool, user_id, post_id, "Unauthorized to update this post").await?;

    let update = QueryBuilder::new("UPDATE posts SET ", ", ")
        .add_param("title", title)
        .add_param("content", content)
        .add_param("images", images.map(|images| to_json_list(&images)))
        .add_param(
            "categories",
            categories.map(|categories| to_json_list(&categories)),
        )
        .build();

    if let Some((query, params)) = update {
        let query = format!("{query} WHERE id = ? AND author_id = ?");
        let mut tx = pool.begin().await?;
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(post_id).bind(user_id).execute(&mut tx).await?;
        tx.commit().await?;
    }

    get_post_in_db(pool, Some(user_id), post_id)
        .await?
        .ok_or(RequestError::NotFound("Post not found"))
}

/// Removes the post together with every like and notification that points at it
/// or at its comments. Comments themselves cascade.
pub async fn delete_post_in_db(
    pool: &SqlitePool,
    user_id: &str,
    post_id: &str,
) -> Result<(), RequestError> {
    ensure_post_author(pool, user_id, post_id, "Unauthorized to delete this post").await?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        DELETE FROM likes
        WHERE (target_type = 'post' AND target_id = $1)
           OR (target_type = 'comment'
               AND target_id IN (SELECT id FROM comments WHERE post_id = $1))
        "#,
    )
    .bind(post_id)
    .execute(&mut tx)
    .await?;

    sqlx::query("DELETE FROM notifications WHERE type IN ('like', 'comment') AND related_id = $1")
        .bind(post_id)
        .execute(&mut tx)
        .await?;

    let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Post not found"));
    }
    tx.commit().await?;
    Ok(())
}
