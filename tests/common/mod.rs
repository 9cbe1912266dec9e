#![allow(dead_code)]

use std::net::TcpListener;

use outdog::{config::AppConfig, AuthResponse, RequestErrorJson};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tempfile::TempDir;

pub const PASSWORD: &str = "password123";

/// A server bound to an ephemeral port over a throwaway SQLite file.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let db_dir = tempfile::tempdir().expect("temp dir");
        let database_url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let config = AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            database_url,
            jwt_secret: "integration-test-secret".to_string(),
            jwt_expiry_days: 7,
        };
        let app = outdog::build_app(config).await.expect("app should build");

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .expect("server from listener")
                .serve(app.into_make_service())
                .await
                .expect("server error");
        });

        TestApp {
            address,
            client: reqwest::Client::new(),
            _db_dir: db_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn post<B: Serialize>(&self, path: &str, token: Option<&str>, body: &B) -> Response {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    /// Sends `raw` verbatim as a JSON body.
    pub async fn post_raw(&self, path: &str, token: Option<&str>, raw: &str) -> Response {
        let mut request = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(raw.to_string());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn put<B: Serialize>(&self, path: &str, token: Option<&str>, body: &B) -> Response {
        let mut request = self.client.put(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.delete(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request failed")
    }

    pub async fn register(&self, name: &str) -> AuthResponse {
        let response = self
            .post(
                "/api/auth/register",
                None,
                &json!({
                    "name": name,
                    "email": format!("{name}@example.com"),
                    "password": PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.expect("auth response")
    }

    /// Creates a post as `token` and returns its id.
    pub async fn create_post(&self, token: &str, title: &str) -> String {
        let response = self
            .post(
                "/api/posts",
                Some(token),
                &json!({
                    "title": title,
                    "content": format!("{title} body"),
                    "categories": ["hiking"],
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let post: outdog::PostResponse = response.json().await.expect("post response");
        post.id
    }
}

pub async fn body<T: DeserializeOwned>(response: Response) -> T {
    response.json().await.expect("json body")
}

/// Asserts the status and returns the `{"error": ...}` message.
pub async fn error(response: Response, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let body: RequestErrorJson = response.json().await.expect("error body");
    body.error
}
