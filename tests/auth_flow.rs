use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `oneshot`

use todo_api::{
    auth::{
        Claims, Role,
        jwt::{JwtKeys, encode_token},
    },
    test_helpers::{
        TEST_ADMIN_PASSWORD, TEST_ADMIN_USERNAME, TEST_JWT_SECRET, create_user, test_app,
    },
};

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get_with_token(app: &Router, uri: &str, access: &str) -> StatusCode {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {access}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn user_can_get_tokens() {
    let (app, state) = test_app().await;
    create_user(&state, "testuser", "testpassword").await;

    let (status, body) = post_json(
        &app,
        "/tokens/",
        json!({ "username": "testuser", "password": "testpassword" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], json!("Bearer"));
    assert_eq!(body["expires_in"], json!(900));
    let access = body["access"].as_str().unwrap();
    assert!(body["refresh"].as_str().is_some());

    assert_eq!(get_with_token(&app, "/todos/", access).await, StatusCode::OK);
}

#[tokio::test]
async fn user_cant_get_tokens_with_incorrect_info() {
    let (app, state) = test_app().await;
    create_user(&state, "testuser", "testpassword").await;

    let (status, body) = post_json(
        &app,
        "/tokens/",
        json!({ "username": "testuser", "password": "incorrectpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "error": "No active account found with the given credentials" })
    );

    let (status, _) = post_json(
        &app,
        "/tokens",
        json!({ "username": "nobody", "password": "testpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rotates_token_pair() {
    let (app, state) = test_app().await;
    create_user(&state, "testuser", "testpassword").await;
    let (_, tokens) = post_json(
        &app,
        "/tokens/",
        json!({ "username": "testuser", "password": "testpassword" }),
    )
    .await;
    let first_refresh = tokens["refresh"].as_str().unwrap().to_string();

    let (status, rotated) =
        post_json(&app, "/tokens/refresh/", json!({ "refresh": first_refresh })).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh"], json!(first_refresh));
    let access = rotated["access"].as_str().unwrap();
    assert_eq!(get_with_token(&app, "/todos/", access).await, StatusCode::OK);

    let (status, _) =
        post_json(&app, "/tokens/refresh", json!({ "refresh": first_refresh })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_refresh_token_is_rejected() {
    let (app, _state) = test_app().await;

    let (status, body) =
        post_json(&app, "/tokens/refresh/", json!({ "refresh": "not-issued" })).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn expired_access_token_is_rejected() {
    let (app, state) = test_app().await;
    let user = create_user(&state, "testuser", "testpassword").await;
    let claims = Claims {
        sub: user.id.to_string(),
        exp: 1_000,
        iat: 100,
        roles: vec![Role::User],
    };
    let token = encode_token(&JwtKeys::from_secret(TEST_JWT_SECRET.as_bytes()), &claims).unwrap();

    assert_eq!(
        get_with_token(&app, "/todos/", &token).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn register_creates_user_who_can_log_in() {
    let (app, _state) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/users/",
        json!({ "username": "newcomer", "password": "newcomerpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], json!("newcomer"));
    assert!(body["id"].as_i64().is_some());

    let (status, _) = post_json(
        &app,
        "/tokens/",
        json!({ "username": "newcomer", "password": "newcomerpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_rejects_duplicates_and_weak_input() {
    let (app, state) = test_app().await;
    create_user(&state, "taken", "takenpassword").await;

    let (status, _) = post_json(
        &app,
        "/users",
        json!({ "username": "taken", "password": "anotherpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post_json(
        &app,
        "/users/",
        json!({ "username": "shorty", "password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/users/",
        json!({ "username": "  ", "password": "longenoughpassword" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn registered_users_are_never_admins() {
    let (app, _state) = test_app().await;
    post_json(
        &app,
        "/users/",
        json!({ "username": "climber", "password": "climberpassword" }),
    )
    .await;
    let (_, tokens) = post_json(
        &app,
        "/tokens/",
        json!({ "username": "climber", "password": "climberpassword" }),
    )
    .await;
    let access = tokens["access"].as_str().unwrap();

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/todos/clear")
                .header(header::AUTHORIZATION, format!("Bearer {access}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn seeded_admin_can_log_in() {
    let (app, _state) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/tokens/",
        json!({ "username": TEST_ADMIN_USERNAME, "password": TEST_ADMIN_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].as_str().is_some());
}

#[tokio::test]
async fn malformed_json_body_is_bad_request() {
    let (app, _state) = test_app().await;

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tokens/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"username\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().is_some());

    let (status, _) = post_json(&app, "/tokens/", json!({ "username": "only" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
