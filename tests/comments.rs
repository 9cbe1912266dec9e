mod common;

use common::{body, error, TestApp};
use outdog::{CommentResponse, NotificationResponse, PostResponse};
use reqwest::StatusCode;
use serde_json::json;

async fn comment(
    app: &TestApp,
    token: &str,
    post_id: &str,
    content: &str,
    parent_id: Option<&str>,
) -> CommentResponse {
    let response = app
        .post(
            &format!("/api/posts/{post_id}/comments"),
            Some(token),
            &json!({ "content": content, "parentId": parent_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body(response).await
}

#[tokio::test]
async fn replies_nest_one_level_deep() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;
    let post_id = app.create_post(&alice.token, "thread").await;

    let root = comment(&app, &bob.token, &post_id, "first!", None).await;
    let reply = comment(&app, &alice.token, &post_id, "thanks", Some(&root.id)).await;
    assert_eq!(reply.parent_id.as_deref(), Some(root.id.as_str()));
    assert!(reply.is_author);

    let nested = comment(&app, &carol.token, &post_id, "me too", Some(&reply.id)).await;
    assert_eq!(nested.parent_id.as_deref(), Some(root.id.as_str()));
    assert_eq!(nested.reply_to_name.as_deref(), Some("alice"));

    let later = comment(&app, &carol.token, &post_id, "second root", None).await;

    let thread: Vec<CommentResponse> =
        body(app.get(&format!("/api/posts/{post_id}/comments"), None).await).await;
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].id, later.id);
    assert_eq!(thread[1].id, root.id);
    let reply_ids: Vec<&str> = thread[1].replies.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(reply_ids, vec![reply.id.as_str(), nested.id.as_str()]);
    assert!(!thread[1].is_author);

    let post: PostResponse = body(app.get(&format!("/api/posts/{post_id}"), None).await).await;
    assert_eq!(post.comments, 4);
}

#[tokio::test]
async fn comment_validation() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let post_id = app.create_post(&alice.token, "one").await;
    let other_post = app.create_post(&alice.token, "two").await;
    let foreign = comment(&app, &alice.token, &other_post, "elsewhere", None).await;

    let empty = app
        .post(
            &format!("/api/posts/{post_id}/comments"),
            Some(&alice.token),
            &json!({ "content": "   " }),
        )
        .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let wrong_parent = app
        .post(
            &format!("/api/posts/{post_id}/comments"),
            Some(&alice.token),
            &json!({ "content": "hi", "parentId": foreign.id }),
        )
        .await;
    assert_eq!(wrong_parent.status(), StatusCode::BAD_REQUEST);

    let missing_post = app
        .post(
            "/api/posts/nope/comments",
            Some(&alice.token),
            &json!({ "content": "hi" }),
        )
        .await;
    assert_eq!(missing_post.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_notify_post_and_parent_authors() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let carol = app.register("carol").await;
    let post_id = app.create_post(&alice.token, "notify").await;

    comment(&app, &alice.token, &post_id, "own comment", None).await;
    let alice_feed: Vec<NotificationResponse> =
        body(app.get("/api/notifications", Some(&alice.token)).await).await;
    assert!(alice_feed.is_empty());

    let root = comment(&app, &bob.token, &post_id, "nice view", None).await;
    let reply = comment(&app, &carol.token, &post_id, "agreed", Some(&root.id)).await;

    let alice_feed: Vec<NotificationResponse> =
        body(app.get("/api/notifications", Some(&alice.token)).await).await;
    assert_eq!(alice_feed.len(), 2);
    assert!(alice_feed.iter().all(|n| n.kind == "comment"));
    assert_eq!(alice_feed[0].comment_id.as_deref(), Some(reply.id.as_str()));
    assert_eq!(alice_feed[1].related_id.as_deref(), Some(post_id.as_str()));
    assert_eq!(
        alice_feed[1].sender.as_ref().map(|s| s.name.as_str()),
        Some("bob")
    );

    let bob_feed: Vec<NotificationResponse> =
        body(app.get("/api/notifications", Some(&bob.token)).await).await;
    assert_eq!(bob_feed.len(), 1);
    assert!(bob_feed[0].content.starts_with("replied to your comment"));
}

#[tokio::test]
async fn comment_likes_edits_and_deletes() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post_id = app.create_post(&alice.token, "post").await;
    let root = comment(&app, &bob.token, &post_id, "root", None).await;
    comment(&app, &alice.token, &post_id, "reply", Some(&root.id)).await;

    let like_path = format!("/api/comments/{}/like", root.id);
    assert_eq!(
        app.post(&like_path, Some(&alice.token), &json!({})).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        error(
            app.post(&like_path, Some(&alice.token), &json!({})).await,
            StatusCode::CONFLICT
        )
        .await,
        "Already liked this comment"
    );

    let thread: Vec<CommentResponse> = body(
        app.get(&format!("/api/posts/{post_id}/comments"), Some(&alice.token))
            .await,
    )
    .await;
    assert_eq!(thread[0].likes, 1);
    assert!(thread[0].is_liked);

    let path = format!("/api/comments/{}", root.id);
    let forbidden = app
        .put(&path, Some(&alice.token), &json!({ "content": "edited" }))
        .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    let edited: CommentResponse = body(
        app.put(&path, Some(&bob.token), &json!({ "content": "edited" }))
            .await,
    )
    .await;
    assert_eq!(edited.content, "edited");

    assert_eq!(
        app.delete(&path, Some(&bob.token)).await.status(),
        StatusCode::OK
    );
    let thread: Vec<CommentResponse> =
        body(app.get(&format!("/api/posts/{post_id}/comments"), None).await).await;
    assert!(thread.is_empty());
    assert_eq!(
        app.delete(&like_path, Some(&alice.token)).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn comments_are_reachable_under_the_posts_prefix() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post_id = app.create_post(&alice.token, "post").await;
    let root = comment(&app, &bob.token, &post_id, "root", None).await;

    let like_path = format!("/api/posts/comments/{}/like", root.id);
    assert_eq!(
        app.post(&like_path, Some(&alice.token), &json!({})).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        app.delete(&like_path, Some(&alice.token)).await.status(),
        StatusCode::OK
    );

    let path = format!("/api/posts/comments/{}", root.id);
    let edited: CommentResponse = body(
        app.put(&path, Some(&bob.token), &json!({ "content": "edited" }))
            .await,
    )
    .await;
    assert_eq!(edited.content, "edited");
    assert_eq!(
        app.delete(&path, Some(&bob.token)).await.status(),
        StatusCode::OK
    );

    let post: PostResponse = body(app.get(&format!("/api/posts/{post_id}"), None).await).await;
    assert_eq!(post.comments, 0);
    assert_eq!(post.id, post_id);
}
