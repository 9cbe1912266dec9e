use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        required, CommentResponse, CreateCommentRequest, MessageWrapper, UpdateCommentRequest,
    },
    db_helpers::{
        create_comment_in_db, delete_comment_in_db, get_post_author_in_db, like_comment_in_db,
        list_comments_in_db, unlike_in_db, update_comment_in_db, NewComment,
    },
    errors::RequestError,
    extractors::{JsonBody, PathParam},
    models::LikeTarget,
    JsonResponse,
};

use super::JsonResult;

// ----------------- Comment Handlers -----------------
pub async fn get_comments(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    PathParam(post_id): PathParam<String>,
) -> JsonResult<Vec<CommentResponse>> {
    if get_post_author_in_db(&pool, &post_id).await?.is_none() {
        return Err(RequestError::NotFound("Post not found"));
    }
    let comments = list_comments_in_db(&pool, maybe_user.get_id(), &post_id).await?;
    Ok(Json(CommentResponse::thread(comments)))
}

pub async fn create_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(post_id): PathParam<String>,
    JsonBody(request): JsonBody<CreateCommentRequest>,
) -> Result<JsonResponse<CommentResponse>, RequestError> {
    let content = required(request.content).ok_or(RequestError::BadRequest("Content is required"))?;
    let comment = create_comment_in_db(
        &pool,
        &user.id,
        &post_id,
        NewComment {
            content,
            parent_id: required(request.parent_id),
            reply_to_name: required(request.reply_to_name),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn update_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
    JsonBody(request): JsonBody<UpdateCommentRequest>,
) -> JsonResult<CommentResponse> {
    let content = required(request.content).ok_or(RequestError::BadRequest("Content is required"))?;
    let comment = update_comment_in_db(&pool, &user.id, &id, content).await?;
    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    delete_comment_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Comment deleted successfully")))
}

pub async fn like_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    like_comment_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Comment liked")))
}

pub async fn unlike_comment(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    unlike_in_db(&pool, &user.id, LikeTarget::Comment, &id).await?;
    Ok(Json(MessageWrapper::new("Comment unliked")))
}
