use sqlx::SqlitePool;

use crate::{
    errors::RequestError,
    models::{Post, Product, UserProfile},
};

use super::{search_posts_in_db, search_products_in_db, search_profiles_in_db};

pub const SEARCH_SECTION_LIMIT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    All,
    Posts,
    Users,
    Products,
}

impl SearchScope {
    fn includes(self, section: SearchScope) -> bool {
        self == SearchScope::All || self == section
    }
}

impl std::str::FromStr for SearchScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SearchScope::All),
            "posts" => Ok(SearchScope::Posts),
            "users" => Ok(SearchScope::Users),
            "products" => Ok(SearchScope::Products),
            _ => Err(()),
        }
    }
}

/// Sections outside the requested scope stay `None`.
#[derive(Debug, Default)]
pub struct SearchResults {
    pub posts: Option<Vec<Post>>,
    pub users: Option<Vec<UserProfile>>,
    pub products: Option<Vec<Product>>,
}

pub async fn search_in_db(
    pool: &SqlitePool,
    viewer_id: Option<&str>,
    term: &str,
    scope: SearchScope,
) -> Result<SearchResults, RequestError> {
    let mut results = SearchResults::default();
    if scope.includes(SearchScope::Posts) {
        let posts = search_posts_in_db(pool, viewer_id, term, SEARCH_SECTION_LIMIT).await?;
        results.posts = Some(posts);
    }
    if scope.includes(SearchScope::Users) {
        results.users = Some(search_profiles_in_db(pool, term, SEARCH_SECTION_LIMIT).await?);
    }
    if scope.includes(SearchScope::Products) {
        results.products = Some(search_products_in_db(pool, term, SEARCH_SECTION_LIMIT).await?);
    }
    tracing::debug!(term, ?scope, "search executed");
    Ok(results)
}
