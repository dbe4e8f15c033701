//! Integration tests for admin user management.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get_auth, post_json, post_json_auth, put_json_auth,
    seed_job, staff_token, token_for, TEST_PASSWORD,
};
use landtrack_core::department::{DEPT_REGISTRATION, DEPT_SURVEY};
use landtrack_core::roles::ROLE_ADMIN;
use landtrack_core::store::MemoryStore;
use serde_json::json;

async fn login(app: axum::Router, username: &str, password: &str) -> StatusCode {
    post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
    .status()
}

#[tokio::test]
async fn staff_cannot_manage_users() {
    let store = Arc::new(MemoryStore::new());
    let token = staff_token(&store, "clerk", &[DEPT_REGISTRATION]).await;
    let app = common::build_test_app(store);

    let response = get_auth(app, "/api/v1/admin/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_and_list_users() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_user(&store, "admin", ROLE_ADMIN, &[]).await;
    let token = token_for(&admin);
    let app = common::build_test_app(store);

    let body = json!({
        "username": "surveyor",
        "display_name": "นายช่าง แม่นยำ",
        "password": "measure2568",
        "role": "staff",
        "departments": [DEPT_SURVEY],
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "surveyor");
    assert_eq!(json["data"]["departments"][0], DEPT_SURVEY);
    assert!(json["data"].get("password_hash").is_none());

    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(get_auth(app.clone(), "/api/v1/admin/users", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    assert_eq!(login(app, "surveyor", "measure2568").await, StatusCode::OK);
}

#[tokio::test]
async fn create_user_validates_input() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_user(&store, "admin", ROLE_ADMIN, &[]).await;
    let token = token_for(&admin);
    let app = common::build_test_app(store);

    let cases = [
        json!({ "username": "a", "display_name": "A", "password": "short", "role": "staff" }),
        json!({ "username": "b", "display_name": "B", "password": "onlyletters", "role": "staff" }),
        json!({ "username": "c", "display_name": "C", "password": "valid2568", "role": "owner" }),
        json!({
            "username": "d",
            "display_name": "D",
            "password": "valid2568",
            "role": "staff",
            "departments": ["ฝ่ายอื่น"],
        }),
    ];
    for body in cases {
        let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn password_reset_unlocks_account() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_user(&store, "admin", ROLE_ADMIN, &[]).await;
    let clerk = create_user(&store, "clerk", "staff", &[DEPT_REGISTRATION]).await;
    let token = token_for(&admin);
    let app = common::build_test_app(store);

    for _ in 0..landtrack_core::user::MAX_FAILED_ATTEMPTS {
        login(app.clone(), "clerk", "wrong-password1").await;
    }
    assert_eq!(
        login(app.clone(), "clerk", TEST_PASSWORD).await,
        StatusCode::FORBIDDEN
    );

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", clerk.id),
        json!({ "password": "fresh2568", "departments": [DEPT_REGISTRATION, DEPT_SURVEY] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["failed_login_count"], 0);
    assert_eq!(json["data"]["departments"].as_array().unwrap().len(), 2);

    assert_eq!(login(app, "clerk", "fresh2568").await, StatusCode::OK);
}

#[tokio::test]
async fn deactivation_blocks_login_but_not_self() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_user(&store, "admin", ROLE_ADMIN, &[]).await;
    let clerk = create_user(&store, "clerk", "staff", &[DEPT_REGISTRATION]).await;
    let token = token_for(&admin);
    let app = common::build_test_app(store);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", admin.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", clerk.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        login(app.clone(), "clerk", TEST_PASSWORD).await,
        StatusCode::FORBIDDEN
    );

    let response = delete_auth(app, "/api/v1/admin/users/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivation_revokes_issued_tokens() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_user(&store, "admin", ROLE_ADMIN, &[]).await;
    let clerk = create_user(&store, "clerk", "staff", &[DEPT_REGISTRATION]).await;
    let admin_token = token_for(&admin);
    let clerk_token = token_for(&clerk);
    let app = common::build_test_app(store);

    let response = get_auth(app.clone(), "/api/v1/jobs", &clerk_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", clerk.id),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/v1/jobs", &clerk_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn department_changes_apply_to_issued_tokens() {
    let store = Arc::new(MemoryStore::new());
    let admin = create_user(&store, "admin", ROLE_ADMIN, &[]).await;
    let clerk = create_user(&store, "clerk", "staff", &[DEPT_REGISTRATION]).await;
    let job_id = seed_job(&store, "S9/2568", DEPT_SURVEY, None).await;
    let admin_token = token_for(&admin);
    let clerk_token = token_for(&clerk);
    let app = common::build_test_app(store);
    let uri = format!("/api/v1/jobs/{job_id}");

    let response = get_auth(app.clone(), &uri, &clerk_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", clerk.id),
        json!({ "departments": [DEPT_REGISTRATION, DEPT_SURVEY] }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &uri, &clerk_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}
