use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        required, CreatePostRequest, MessageWrapper, PostQueryParams, PostResponse,
        UpdatePostRequest,
    },
    db_helpers::{
        create_post_in_db, delete_post_in_db, get_post_in_db, like_post_in_db, list_posts_in_db,
        unlike_in_db, update_post_in_db, NewPost,
    },
    errors::RequestError,
    extractors::{JsonBody, PathParam, QueryParams},
    models::LikeTarget,
    JsonResponse,
};

use super::JsonResult;

const MAX_CATEGORIES: usize = 2;

fn check_categories(categories: &[String]) -> Result<(), RequestError> {
    if categories.len() > MAX_CATEGORIES {
        return Err(RequestError::BadRequest("At most 2 categories are allowed"));
    }
    Ok(())
}

// ----------------- Post Handlers -----------------
pub async fn list_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    QueryParams(mut params): QueryParams<PostQueryParams>,
) -> JsonResult<Vec<PostResponse>> {
    params.category = required(params.category);
    params.author = required(params.author);
    let viewer_id = maybe_user.as_ref().map(|user| user.id.as_str());
    let posts = list_posts_in_db(&pool, viewer_id, &params).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn get_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<PostResponse> {
    let post = get_post_in_db(&pool, maybe_user.get_id(), &id)
        .await?
        .ok_or(RequestError::NotFound("Post not found"))?;
    Ok(Json(post.into()))
}

pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> Result<JsonResponse<PostResponse>, RequestError> {
    let (title, content) = match (required(request.title), required(request.content)) {
        (Some(title), Some(content)) => (title, content),
        _ => return Err(RequestError::BadRequest("Title and content are required")),
    };
    check_categories(&request.categories)?;

    let post = create_post_in_db(
        &pool,
        &user.id,
        NewPost {
            title,
            content,
            images: request.images,
            categories: request.categories,
        },
    )
    .await?;
    tracing::info!(post_id = %post.id, author_id = %user.id, "post created");
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn update_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
    JsonBody(mut request): JsonBody<UpdatePostRequest>,
) -> JsonResult<PostResponse> {
    if let Some(categories) = &request.categories {
        check_categories(categories)?;
    }
    if let Some(title) = request.title.take() {
        request.title = Some(
            required(Some(title)).ok_or(RequestError::BadRequest("Title cannot be empty"))?,
        );
    }

    let post = update_post_in_db(&pool, &user.id, &id, request).await?;
    Ok(Json(post.into()))
}

pub async fn delete_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    delete_post_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Post deleted successfully")))
}

// ----------------- Like Handlers -----------------
pub async fn like_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    like_post_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Post liked")))
}

pub async fn unlike_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    unlike_in_db(&pool, &user.id, LikeTarget::Post, &id).await?;
    Ok(Json(MessageWrapper::new("Post unliked")))
}
