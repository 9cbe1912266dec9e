mod common;

use common::{body, error, TestApp};
use outdog::{
    ChatMessageResponse, ChatSessionResponse, MessageSentWrapper, NotificationResponse,
};
use reqwest::StatusCode;
use serde_json::json;

async fn send(app: &TestApp, token: &str, recipient_id: &str, text: &str) -> MessageSentWrapper {
    let response = app
        .post(
            "/api/messages",
            Some(token),
            &json!({ "recipientId": recipient_id, "text": text }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body(response).await
}

#[tokio::test]
async fn one_session_per_pair() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let first = send(&app, &alice.token, &bob.user_id, "hi bob").await;
    let reply = send(&app, &bob.token, &alice.user_id, "hi alice").await;
    assert_eq!(first.session_id, reply.session_id);

    let sessions: Vec<ChatSessionResponse> =
        body(app.get("/api/messages/sessions", Some(&alice.token)).await).await;
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].participant.id, bob.user_id);
    assert_eq!(sessions[0].last_message, "hi alice");
    assert_eq!(sessions[0].unread_count, 1);
}

#[tokio::test]
async fn sessions_are_ordered_by_latest_activity() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;

    send(&app, &alice.token, &bob.user_id, "to bob").await;
    send(&app, &alice.token, &carol.user_id, "to carol").await;
    let sessions: Vec<ChatSessionResponse> =
        body(app.get("/api/messages/sessions", Some(&alice.token)).await).await;
    let order: Vec<&str> = sessions.iter().map(|s| s.participant.id.as_str()).collect();
    assert_eq!(order, vec![carol.user_id.as_str(), bob.user_id.as_str()]);

    send(&app, &bob.token, &alice.user_id, "back to alice").await;
    let sessions: Vec<ChatSessionResponse> =
        body(app.get("/api/messages/sessions", Some(&alice.token)).await).await;
    let order: Vec<&str> = sessions.iter().map(|s| s.participant.id.as_str()).collect();
    assert_eq!(order, vec![bob.user_id.as_str(), carol.user_id.as_str()]);
    assert_eq!(sessions[0].last_message, "back to alice");
}

#[tokio::test]
async fn reading_a_session_marks_incoming_messages() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;

    let sent = send(&app, &alice.token, &bob.user_id, "first").await;
    send(&app, &alice.token, &bob.user_id, "second").await;
    let path = format!("/api/messages/sessions/{}", sent.session_id);

    let messages: Vec<ChatMessageResponse> = body(app.get(&path, Some(&bob.token)).await).await;
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert!(messages.iter().all(|m| !m.is_me));

    let sessions: Vec<ChatSessionResponse> =
        body(app.get("/api/messages/sessions", Some(&bob.token)).await).await;
    assert_eq!(sessions[0].unread_count, 0);

    let outsider = app.get(&path, Some(&carol.token)).await;
    assert_eq!(outsider.status(), StatusCode::FORBIDDEN);
    let missing = app
        .get("/api/messages/sessions/nope", Some(&bob.token))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn single_message_can_be_marked_read_by_its_recipient() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let sent = send(&app, &alice.token, &bob.user_id, "ping").await;
    let path = format!("/api/messages/{}/read", sent.message_id);

    assert_eq!(
        app.put(&path, Some(&alice.token), &json!({})).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.put(&path, Some(&bob.token), &json!({})).await.status(),
        StatusCode::OK
    );
    let sessions: Vec<ChatSessionResponse> =
        body(app.get("/api/messages/sessions", Some(&bob.token)).await).await;
    assert_eq!(sessions[0].unread_count, 0);

    let legacy_path = format!("/api/messages/read/{}", sent.message_id);
    assert_eq!(
        app.put(&legacy_path, Some(&bob.token), &json!({}))
            .await
            .status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn message_validation_and_notification() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let to_self = app
        .post(
            "/api/messages",
            Some(&alice.token),
            &json!({ "recipientId": alice.user_id, "text": "hello me" }),
        )
        .await;
    assert_eq!(to_self.status(), StatusCode::BAD_REQUEST);

    let no_text = app
        .post(
            "/api/messages",
            Some(&alice.token),
            &json!({ "recipientId": bob.user_id }),
        )
        .await;
    assert_eq!(no_text.status(), StatusCode::BAD_REQUEST);

    let unknown = app
        .post(
            "/api/messages",
            Some(&alice.token),
            &json!({ "recipientId": "nobody", "text": "hello" }),
        )
        .await;
    assert_eq!(
        error(unknown, StatusCode::NOT_FOUND).await,
        "Recipient not found"
    );

    let long_text = "a".repeat(80);
    let sent = send(&app, &alice.token, &bob.user_id, &long_text).await;
    let notifications: Vec<NotificationResponse> =
        body(app.get("/api/notifications", Some(&bob.token)).await).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "message");
    assert_eq!(
        notifications[0].related_id.as_deref(),
        Some(sent.session_id.as_str())
    );
    assert_eq!(notifications[0].content, format!("{}...", "a".repeat(50)));
}
