use sqlx::SqlitePool;

use crate::{errors::RequestError, models::User};

mod cart_helpers;
mod comment_helpers;
mod like_helpers;
mod message_helpers;
mod notification_helpers;
mod order_helpers;
mod post_helpers;
mod product_helpers;
mod profile_helpers;
mod search_helpers;
mod user_helpers;

pub use cart_helpers::*;
pub use comment_helpers::*;
pub use like_helpers::*;
pub use message_helpers::*;
pub use notification_helpers::*;
pub use order_helpers::*;
pub use post_helpers::*;
pub use product_helpers::*;
pub use profile_helpers::*;
pub use search_helpers::*;
pub use user_helpers::*;

/// Collects `column = ?` assignments for the columns that were actually supplied.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: &'static str,
}

impl QueryBuilder {
    fn new(initial: &str, seperator: &'static str) -> Self {
        Self {
            query: initial.to_owned(),
            params: vec![],
            seperator,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            if !self.params.is_empty() {
                self.query.push_str(self.seperator);
            }
            self.query.push_str(column);
            self.query.push_str(" = ?");
            self.params.push(value);
        }
        self
    }

    /// `None` when no column was supplied.
    fn build(self) -> Option<(String, Vec<String>)> {
        if self.params.is_empty() {
            None
        } else {
            Some((self.query, self.params))
        }
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ----------------- Helper Functions -----------------

pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, RequestError> {
    let result = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, avatar, bio, created_at FROM users WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

pub async fn get_user_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>, RequestError> {
    let result = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, avatar, bio, created_at FROM users WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_builder_joins_supplied_columns() {
        let (query, params) = QueryBuilder::new("UPDATE posts SET ", ", ")
            .add_param("title", Some("t".to_string()))
            .add_param("content", None)
            .add_param("images", Some("[]".to_string()))
            .build()
            .unwrap();
        assert_eq!(query, "UPDATE posts SET title = ?, images = ?");
        assert_eq!(params, vec!["t", "[]"]);
    }

    #[test]
    fn query_builder_without_columns_builds_nothing() {
        assert!(QueryBuilder::new("UPDATE users SET ", ", ")
            .add_param("name", None)
            .build()
            .is_none());
    }
}
