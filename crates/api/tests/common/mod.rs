#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use landtrack_core::job::NewJob;
use landtrack_core::roles::{ROLE_ADMIN, ROLE_STAFF};
use landtrack_core::status::JobStatus;
use landtrack_core::store::{JobStore, MemoryStore, UserStore};
use landtrack_core::user::{NewUser, User};
use tower::ServiceExt;

use landtrack_api::auth::jwt::{issue_token, JwtConfig};
use landtrack_api::auth::password::hash_password;
use landtrack_api::config::ServerConfig;
use landtrack_api::router::build_app_router;
use landtrack_api::state::AppState;

pub const TEST_PASSWORD: &str = "landoffice2568";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        bootstrap_admin_username: "admin".to_string(),
        bootstrap_admin_password: None,
        jwt: test_jwt_config(),
    }
}

/// The production router over `store`.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_app_router(AppState::new(store, test_config()))
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn create_user(
    store: &MemoryStore,
    username: &str,
    role: &str,
    departments: &[&str],
) -> User {
    store
        .create_user(NewUser {
            username: username.to_string(),
            display_name: format!("{username} display"),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
            departments: departments.iter().map(|d| d.to_string()).collect(),
        })
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    issue_token(user, &test_jwt_config()).expect("token generation should succeed")
}

/// An admin account and its bearer token.
pub async fn admin_token(store: &MemoryStore) -> String {
    let user = create_user(store, "admin", ROLE_ADMIN, &[]).await;
    token_for(&user)
}

/// A staff account limited to `departments` and its bearer token.
pub async fn staff_token(store: &MemoryStore, username: &str, departments: &[&str]) -> String {
    let user = create_user(store, username, ROLE_STAFF, departments).await;
    token_for(&user)
}

pub fn new_job(reception_no: &str, department: &str, step: Option<&str>) -> NewJob {
    NewJob {
        reception_no: reception_no.to_string(),
        date: Utc::now().date_naive(),
        department: department.to_string(),
        job_type: "จดทะเบียนขาย".to_string(),
        owner: "นายสมชาย ใจดี".to_string(),
        status: JobStatus::Pending,
        step: step.map(str::to_string),
        note: String::new(),
        assignees: Vec::new(),
    }
}

pub async fn seed_job(
    store: &MemoryStore,
    reception_no: &str,
    department: &str,
    step: Option<&str>,
) -> i64 {
    store
        .create_job(new_job(reception_no, department, step))
        .await
        .expect("job creation should succeed")
        .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Percent-encode a path segment (department names are Thai).
pub fn encode(segment: &str) -> String {
    segment
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
