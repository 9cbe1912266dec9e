use sqlx::SqlitePool;

use crate::{
    data_formats::UpdateUserRequest,
    errors::RequestError,
    models::{User, UserProfile},
};

use super::{new_id, QueryBuilder};

const USER_PROFILE_QUERY: &str = r#"
    SELECT users.id,
           users.name,
           users.email,
           users.avatar,
           users.bio,
           users.created_at,
           (SELECT COUNT(*) FROM follows WHERE follower_id = users.id)  AS "following",
           (SELECT COUNT(*) FROM follows WHERE following_id = users.id) AS "followers",
           (SELECT COUNT(*) FROM likes WHERE user_id = users.id)        AS "likes"
    FROM   users
"#;

pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub password: String,
    pub avatar: Option<String>,
    pub bio: String,
}

pub async fn insert_user(pool: &SqlitePool, user: NewUser) -> Result<User, RequestError> {
    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password, avatar, bio)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, name, email, password, avatar, bio, created_at
        "#,
    )
    .bind(new_id())
    .bind(user.name)
    .bind(user.email)
    .bind(user.password)
    .bind(user.avatar)
    .bind(user.bio)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(user)
}

pub async fn get_profile_by_id_in_db(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<UserProfile>, RequestError> {
    let query = format!("{USER_PROFILE_QUERY} WHERE users.id = $1");
    let result = sqlx::query_as::<_, UserProfile>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

/// Looks a profile up by id first, then by name.
pub async fn get_profile_by_identifier_in_db(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<UserProfile>, RequestError> {
    let query = format!(
        "{USER_PROFILE_QUERY} WHERE users.id = $1 OR users.name = $1 \
         ORDER BY users.id = $1 DESC LIMIT 1"
    );
    let result = sqlx::query_as::<_, UserProfile>(&query)
        .bind(identifier)
        .fetch_optional(pool)
        .await?;
    Ok(result)
}

pub async fn search_profiles_in_db(
    pool: &SqlitePool,
    term: &str,
    limit: i64,
) -> Result<Vec<UserProfile>, RequestError> {
    let query = format!(
        "{USER_PROFILE_QUERY} WHERE users.name LIKE $1 OR users.bio LIKE $1 \
         ORDER BY users.name LIMIT $2"
    );
    let result = sqlx::query_as::<_, UserProfile>(&query)
        .bind(format!("%{term}%"))
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: &str,
    UpdateUserRequest { name, avatar, bio }: UpdateUserRequest,
) -> Result<UserProfile, RequestError> {
    let update = QueryBuilder::new("UPDATE users SET ", ", ")
        .add_param("name", name)
        .add_param("avatar", avatar)
        .add_param("bio", bio)
        .build();

    if let Some((query, params)) = update {
        let query = format!("{query} WHERE id = ?");
        let mut tx = pool.begin().await?;
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(id).execute(&mut tx).await?;
        tx.commit().await?;
    }

    match get_profile_by_id_in_db(pool, id).await? {
        Some(profile) => Ok(profile),
        None => Err(RequestError::NotFound("User not found")),
    }
}

/// Deletes the account. Rows owned by the user cascade through foreign keys;
/// likes other users left on the user's posts and comments are removed here
/// because `likes.target_id` carries no foreign key.
pub async fn delete_user_in_db(pool: &SqlitePool, id: &str) -> Result<bool, RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        DELETE FROM likes
        WHERE (target_type = 'post' AND target_id IN (SELECT id FROM posts WHERE author_id = $1))
           OR (target_type = 'comment' AND target_id IN (
                SELECT id FROM comments
                WHERE author_id = $1
                   OR post_id IN (SELECT id FROM posts WHERE author_id = $1)
                   OR parent_id IN (SELECT id FROM comments WHERE author_id = $1)))
        "#,
    )
    .bind(id)
    .execute(&mut tx)
    .await?;

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
