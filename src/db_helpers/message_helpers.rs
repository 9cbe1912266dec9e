use sqlx::SqlitePool;

use crate::{
    data_formats::truncate_chars,
    errors::RequestError,
    models::{ChatSession, Message, NotificationKind},
};

use super::{get_user_by_id, insert_notification, new_id, NewNotification};

// $1 is the viewer; the participant is whichever side of the pair is not them.
const SESSION_QUERY: &str = r#"
    SELECT * FROM (
        SELECT s.id                                            AS "id",
               s.created_at                                    AS "created_at",
               u.id                                            AS "participant_id",
               u.name                                          AS "participant_name",
               u.avatar                                        AS "participant_avatar",
               (SELECT m.text
                FROM   messages m
                WHERE  m.session_id = s.id
                ORDER  BY m.created_at DESC, m.rowid DESC
                LIMIT  1)                                      AS "last_message",
               (SELECT m.created_at
                FROM   messages m
                WHERE  m.session_id = s.id
                ORDER  BY m.created_at DESC, m.rowid DESC
                LIMIT  1)                                      AS "last_message_at",
               (SELECT MAX(m.rowid)
                FROM   messages m
                WHERE  m.session_id = s.id)                    AS "last_message_rowid",
               s.rowid                                         AS "session_rowid",
               (SELECT COUNT(*)
                FROM   messages m
                WHERE  m.session_id = s.id
                       AND m.sender_id <> $1
                       AND m.is_read = 0)                      AS "unread_count"
        FROM   chat_sessions s
               INNER JOIN users u
                       ON u.id = CASE WHEN s.user1_id = $1 THEN s.user2_id ELSE s.user1_id END
        WHERE  s.user1_id = $1 OR s.user2_id = $1
    )
    ORDER  BY COALESCE(last_message_at, created_at) DESC,
              last_message_rowid DESC,
              session_rowid DESC
"#;

const MESSAGE_PREVIEW_CHARS: usize = 50;

/// Sessions store the pair in a fixed order so each pair maps to one row.
fn session_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

pub async fn list_sessions_in_db(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ChatSession>, RequestError> {
    let result = sqlx::query_as::<_, ChatSession>(SESSION_QUERY)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(result)
}

/// Messages of a session, oldest first. The other party's messages are
/// marked read once they have been fetched.
pub async fn get_session_messages_in_db(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
) -> Result<Vec<Message>, RequestError> {
    let (user1_id, user2_id) = sqlx::query_as::<_, (String, String)>(
        "SELECT user1_id, user2_id FROM chat_sessions WHERE id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?
    .ok_or(RequestError::NotFound("Session not found"))?;
    if user1_id != user_id && user2_id != user_id {
        return Err(RequestError::Forbidden("Access denied"));
    }

    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, session_id, sender_id, text, is_read, created_at
        FROM messages
        WHERE session_id = $1
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE messages SET is_read = 1 WHERE session_id = $1 AND sender_id <> $2 AND is_read = 0",
    )
    .bind(session_id)
    .bind(user_id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;

    Ok(messages)
}

/// Sends `text` to `recipient_id`, opening their shared session on first
/// contact. Returns the new message id and the session id.
pub async fn send_message_in_db(
    pool: &SqlitePool,
    sender_id: &str,
    recipient_id: &str,
    text: String,
) -> Result<(String, String), RequestError> {
    if sender_id == recipient_id {
        return Err(RequestError::BadRequest("Cannot message yourself"));
    }
    if get_user_by_id(pool, recipient_id).await?.is_none() {
        return Err(RequestError::NotFound("Recipient not found"));
    }

    let (user1_id, user2_id) = session_pair(sender_id, recipient_id);
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO chat_sessions (id, user1_id, user2_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user1_id, user2_id) DO NOTHING
        "#,
    )
    .bind(new_id())
    .bind(user1_id)
    .bind(user2_id)
    .execute(&mut tx)
    .await?;
    let session_id = sqlx::query_scalar::<_, String>(
        "SELECT id FROM chat_sessions WHERE user1_id = $1 AND user2_id = $2",
    )
    .bind(user1_id)
    .bind(user2_id)
    .fetch_one(&mut tx)
    .await?;

    let message_id = new_id();
    sqlx::query(
        r#"
        INSERT INTO messages (id, session_id, sender_id, text)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(message_id.as_str())
    .bind(session_id.as_str())
    .bind(sender_id)
    .bind(text.as_str())
    .execute(&mut tx)
    .await?;

    insert_notification(
        &mut tx,
        NewNotification {
            user_id: recipient_id,
            kind: NotificationKind::Message,
            sender_id,
            content: truncate_chars(&text, MESSAGE_PREVIEW_CHARS),
            related_id: Some(&session_id),
            comment_id: None,
        },
    )
    .await?;
    tx.commit().await?;

    Ok((message_id, session_id))
}

/// Only messages received by `user_id` in one of their sessions can be marked.
pub async fn mark_message_read_in_db(
    pool: &SqlitePool,
    user_id: &str,
    message_id: &str,
) -> Result<(), RequestError> {
    let result = sqlx::query(
        r#"
        UPDATE messages SET is_read = 1
        WHERE id = $1
          AND sender_id <> $2
          AND session_id IN (SELECT id FROM chat_sessions WHERE user1_id = $2 OR user2_id = $2)
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Message not found"));
    }
    Ok(())
}
