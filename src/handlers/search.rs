use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::MaybeUser,
    data_formats::{required, SearchQueryParams, SearchResultsWrapper, UserResponse},
    db_helpers::{search_in_db, SearchResults, SearchScope},
    errors::RequestError,
    extractors::QueryParams,
};

use super::JsonResult;

pub async fn search(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    QueryParams(params): QueryParams<SearchQueryParams>,
) -> JsonResult<SearchResultsWrapper> {
    let term = required(params.q).ok_or(RequestError::BadRequest("Search query is required"))?;
    let scope: SearchScope = params
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .unwrap_or("all")
        .parse()
        .map_err(|_| RequestError::BadRequest("Invalid search type"))?;

    let SearchResults {
        posts,
        users,
        products,
    } = search_in_db(&pool, maybe_user.get_id(), &term, scope).await?;
    Ok(Json(SearchResultsWrapper {
        posts: posts.map(|posts| posts.into_iter().map(Into::into).collect()),
        users: users.map(|users| {
            users
                .into_iter()
                .map(|profile| UserResponse::new(profile, false))
                .collect()
        }),
        products: products.map(|products| products.into_iter().map(Into::into).collect()),
    }))
}
