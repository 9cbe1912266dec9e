use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    authentication::AuthUser,
    data_formats::{
        required, ChatMessageResponse, ChatSessionResponse, MessageSentWrapper, MessageWrapper,
        SendMessageRequest,
    },
    db_helpers::{
        get_session_messages_in_db, list_sessions_in_db, mark_message_read_in_db,
        send_message_in_db,
    },
    errors::RequestError,
    extractors::{JsonBody, PathParam},
    JsonResponse,
};

use super::JsonResult;

// ----------------- Message Handlers -----------------
pub async fn list_sessions(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
) -> JsonResult<Vec<ChatSessionResponse>> {
    let sessions = list_sessions_in_db(&pool, &user.id).await?;
    Ok(Json(sessions.into_iter().map(ChatSessionResponse::from).collect()))
}

pub async fn get_session_messages(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(session_id): PathParam<String>,
) -> JsonResult<Vec<ChatMessageResponse>> {
    let messages = get_session_messages_in_db(&pool, &user.id, &session_id).await?;
    Ok(Json(
        messages
            .into_iter()
            .map(|message| ChatMessageResponse::new(message, &user.id))
            .collect(),
    ))
}

pub async fn send_message(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> Result<JsonResponse<MessageSentWrapper>, RequestError> {
    let recipient_id = required(request.recipient_id);
    let text = required(request.text);
    let (recipient_id, text) = match (recipient_id, text) {
        (Some(recipient_id), Some(text)) => (recipient_id, text),
        _ => return Err(RequestError::BadRequest("Recipient and text are required")),
    };

    let (message_id, session_id) = send_message_in_db(&pool, &user.id, &recipient_id, text).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageSentWrapper {
            message_id,
            session_id,
        }),
    ))
}

pub async fn mark_message_read(
    Extension(pool): Extension<Arc<SqlitePool>>,
    user: AuthUser,
    PathParam(id): PathParam<String>,
) -> JsonResult<MessageWrapper> {
    mark_message_read_in_db(&pool, &user.id, &id).await?;
    Ok(Json(MessageWrapper::new("Message marked as read")))
}
