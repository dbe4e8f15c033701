//! HTTP-level integration tests for login, the current-user endpoint,
//! bearer-token handling and account lockout.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, create_user, get, get_auth, post_json, token_for, TEST_PASSWORD};
use landtrack_core::department::DEPT_SURVEY;
use landtrack_core::roles::{ROLE_ADMIN, ROLE_STAFF};
use landtrack_core::store::{MemoryStore, UserStore};
use landtrack_core::user::MAX_FAILED_ATTEMPTS;
use tower::ServiceExt;

async fn login(app: axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await
}

#[tokio::test]
async fn test_login_success() {
    let store = Arc::new(MemoryStore::new());
    let user = create_user(&store, "somchai", ROLE_STAFF, &[DEPT_SURVEY]).await;
    let app = common::build_test_app(store.clone());

    let response = login(app, "somchai", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "staff");
    assert_eq!(json["user"]["departments"][0], DEPT_SURVEY);
    assert!(json["user"].get("password_hash").is_none());

    let stored = store.find_user(user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let store = Arc::new(MemoryStore::new());
    create_user(&store, "wrongpw", ROLE_STAFF, &[]).await;
    let app = common::build_test_app(store);

    let response = login(app, "wrongpw", "incorrect123").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_nonexistent_user() {
    let app = common::build_test_app(Arc::new(MemoryStore::new()));
    let response = login(app, "ghost", "whatever123").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_inactive_user() {
    let store = Arc::new(MemoryStore::new());
    let mut user = create_user(&store, "inactive", ROLE_STAFF, &[]).await;
    user.is_active = false;
    store.update_user(&user).await.unwrap();
    let app = common::build_test_app(store);

    let response = login(app, "inactive", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_account_locks_after_repeated_failures() {
    let store = Arc::new(MemoryStore::new());
    let user = create_user(&store, "locked", ROLE_STAFF, &[]).await;
    let app = common::build_test_app(store.clone());

    for _ in 0..MAX_FAILED_ATTEMPTS {
        let response = login(app.clone(), "locked", "not-the-password1").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // Correct password is refused while locked.
    let response = login(app, "locked", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let stored = store.find_user(user.id).await.unwrap().unwrap();
    assert!(stored.locked_until.is_some());
}

#[tokio::test]
async fn test_success_resets_failed_counter() {
    let store = Arc::new(MemoryStore::new());
    let user = create_user(&store, "forgetful", ROLE_STAFF, &[]).await;
    let app = common::build_test_app(store.clone());

    login(app.clone(), "forgetful", "not-the-password1").await;
    login(app.clone(), "forgetful", "not-the-password2").await;
    assert_eq!(
        store.find_user(user.id).await.unwrap().unwrap().failed_login_count,
        2
    );

    let response = login(app, "forgetful", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        store.find_user(user.id).await.unwrap().unwrap().failed_login_count,
        0
    );
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let store = Arc::new(MemoryStore::new());
    let user = create_user(&store, "boss", ROLE_ADMIN, &[]).await;
    let app = common::build_test_app(store);

    let response = get_auth(app, "/api/v1/auth/me", &token_for(&user)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "boss");
    assert_eq!(json["data"]["role"], "admin");
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = common::build_test_app(Arc::new(MemoryStore::new()));
    let response = get(app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn test_malformed_and_invalid_tokens() {
    let app = common::build_test_app(Arc::new(MemoryStore::new()));

    let request = Request::builder()
        .uri("/api/v1/auth/me")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}
