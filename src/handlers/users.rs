use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        MessageWrapper, PostQueryParams, PostResponse, UpdateUserRequest, UserResponse,
        UserSummaryResponse,
    },
    db_helpers::{
        delete_user_in_db, follow_user_in_db, get_followers_in_db, get_following_in_db,
        get_profile_by_identifier_in_db, list_posts_in_db, unfollow_user_in_db, update_user_in_db,
    },
    errors::RequestError,
    extractors::{JsonBody, PathParam, QueryParams},
};

use super::JsonResult;

// ----------------- User Handlers -----------------
pub async fn get_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    PathParam(identifier): PathParam<String>,
) -> JsonResult<UserResponse> {
    let profile = get_profile_by_identifier_in_db(&pool, &identifier)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    Ok(Json(UserResponse::new(profile, false)))
}

pub async fn update_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
    JsonBody(mut request): JsonBody<UpdateUserRequest>,
) -> JsonResult<UserResponse> {
    if id != user.id {
        return Err(RequestError::Forbidden("Can only update your own profile"));
    }
    if let Some(name) = request.name.take() {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(RequestError::BadRequest("Name cannot be empty"));
        }
        request.name = Some(name);
    }

    let profile = update_user_in_db(&pool, &user.id, request)
        .await
        .map_err(|e| e.on_unique_violation("Username already exists"))?;
    Ok(Json(UserResponse::new(profile, true)))
}

pub async fn delete_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    if id != user.id {
        return Err(RequestError::Forbidden("Can only delete your own account"));
    }
    if !delete_user_in_db(&pool, &user.id).await? {
        return Err(RequestError::NotFound("User not found"));
    }
    tracing::info!(user_id = %user.id, "user deleted");
    Ok(Json(MessageWrapper::new("Account deleted successfully")))
}

pub async fn get_user_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    PathParam(id): PathParam<String>,
    QueryParams(mut params): QueryParams<PostQueryParams>,
) -> JsonResult<Vec<PostResponse>> {
    params.category = None;
    params.author = Some(id);
    let viewer_id = maybe_user.as_ref().map(|user| user.id.as_str());
    let posts = list_posts_in_db(&pool, viewer_id, &params).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

// ----------------- Follow Handlers -----------------
pub async fn follow_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    follow_user_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Followed successfully")))
}

pub async fn unfollow_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    unfollow_user_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Unfollowed successfully")))
}

pub async fn get_followers(
    Extension(pool): Extension<Arc<SqlitePool>>,
    PathParam(id): PathParam<String>,
) -> JsonResult<Vec<UserSummaryResponse>> {
    let followers = get_followers_in_db(&pool, &id).await?;
    Ok(Json(followers.into_iter().map(Into::into).collect()))
}

pub async fn get_following(
    Extension(pool): Extension<Arc<SqlitePool>>,
    PathParam(id): PathParam<String>,
) -> JsonResult<Vec<UserSummaryResponse>> {
    let following = get_following_in_db(&pool, &id).await?;
    Ok(Json(following.into_iter().map(Into::into).collect()))
}
