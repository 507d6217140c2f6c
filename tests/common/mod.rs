#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use boat_api::app::build_router;
use boat_api::repos::memory::{InMemoryBoatRepo, InMemoryUserRepo};
use boat_api::services::auth::{
    BcryptHasher, PasswordHasher, SigningKey, TokenCodec, authority, build_auth,
};
use boat_api::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN: (&str, &str) = ("alice", "admin-pass");
pub const USER: (&str, &str) = ("bob", "user-pass");
pub const VALIDITY_SECONDS: u64 = 300;

const KEY: [u8; 32] = [42; 32];

pub struct TestApp {
    router: Router,
    /// Same key as the app, for crafting tokens directly.
    pub codec: TokenCodec,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let hasher = BcryptHasher::new(4);
        let users = InMemoryUserRepo::new()
            .with_user(ADMIN.0, hasher.hash(ADMIN.1).unwrap(), &[authority::ROLE_ADMIN])
            .with_user(USER.0, hasher.hash(USER.1).unwrap(), &[authority::ROLE_USER]);

        let key = SigningKey::from_bytes(&KEY).unwrap();
        let auth = build_auth(
            key.clone(),
            VALIDITY_SECONDS,
            Arc::new(users),
            Arc::new(hasher),
        )
        .unwrap();
        let state = AppState::new(auth, Arc::new(InMemoryBoatRepo::new()));

        Self {
            router: build_router(state),
            codec: TokenCodec::new(key),
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn login(&self, (login, password): (&str, &str)) -> TestResponse {
        let body = serde_json::json!({ "login": login, "password": password });
        self.send(json_request("POST", "/auth/token", None, &body)).await
    }

    pub async fn token(&self, credentials: (&str, &str)) -> String {
        let res = self.login(credentials).await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.body["accessToken"].as_str().unwrap().to_owned()
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Shape shared by every error response.
pub fn assert_error_body(res: &TestResponse, category: &str, first_problem: &str) {
    let code = res.body["code"].as_str().unwrap();
    assert_eq!(code.len(), 11, "code {code}");
    assert!(code[..10].bytes().all(|b| b.is_ascii_digit()), "code {code}");
    assert!(code[10..].bytes().all(|b| b.is_ascii_uppercase()), "code {code}");

    assert_eq!(res.body["category"], category);
    assert!(res.body["time"].as_str().unwrap().ends_with('Z'));
    assert_eq!(res.body["problems"][0]["error"], first_problem);
}
