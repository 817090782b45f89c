//! HTTP 통합 테스트
//!
//! 미들웨어까지 포함한 전체 라우터로 세션 흐름을 확인합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chirpy_api::{create_router, AppState, ChirpResponse, LoginResponse, RefreshResponse};
use chirpy_core::{AuthConfig, PasswordPolicy};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let auth = AuthConfig::new("http-flow-secret").with_password_policy(PasswordPolicy::new(8, 1, 1));
    let state = Arc::new(AppState::in_memory(&auth, "dev"));
    create_router(state, None, Duration::from_secs(10))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_and_login(app: &Router, email: &str) -> LoginResponse {
    let credentials = json!({"email": email, "password": "pw12345"});

    let response = send(app, Method::POST, "/api/users", None, Some(credentials.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(app, Method::POST, "/api/login", None, Some(credentials)).await;
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

#[tokio::test]
async fn test_session_lifecycle_over_http() {
    let app = app();
    let session = register_and_login(&app, "a@b.com").await;

    // Access Token으로 보호된 요청
    let response = send(
        &app,
        Method::POST,
        "/api/chirps",
        Some(&session.token),
        Some(json!({"body": "hello"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let chirp: ChirpResponse = read_json(response).await;
    assert_eq!(chirp.user_id, session.id);

    // 갱신된 Access Token도 같은 주체
    let response = send(&app, Method::POST, "/api/refresh", Some(&session.refresh_token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed: RefreshResponse = read_json(response).await;

    let response = send(
        &app,
        Method::PUT,
        "/api/users",
        Some(&refreshed.token),
        Some(json!({"email": "a@b.com", "password": "pw67890"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 폐기 후 갱신 불가
    let response = send(&app, Method::POST, "/api/revoke", Some(&session.refresh_token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::POST, "/api/refresh", Some(&session.refresh_token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_and_malformed_authorization() {
    let app = app();
    let body = Some(json!({"body": "hello"}));

    let response = send(&app, Method::POST, "/api/chirps", None, body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chirps")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"body": "hello"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::POST, "/api/chirps", Some("a.b.c"), body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_only_owner_can_delete_chirp() {
    let app = app();
    let owner = register_and_login(&app, "owner@b.com").await;
    let other = register_and_login(&app, "other@b.com").await;

    let response = send(
        &app,
        Method::POST,
        "/api/chirps",
        Some(&owner.token),
        Some(json!({"body": "mine"})),
    )
    .await;
    let chirp: ChirpResponse = read_json(response).await;
    let uri = format!("/api/chirps/{}", chirp.id);

    let response = send(&app, Method::DELETE, &uri, Some(&other.token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, Method::DELETE, &uri, Some(&owner.token), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_reset_invalidates_sessions() {
    let app = app();
    let session = register_and_login(&app, "a@b.com").await;

    let response = send(&app, Method::POST, "/admin/reset", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::POST, "/api/refresh", Some(&session.refresh_token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "a@b.com", "password": "pw12345"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_polka_upgrade_over_http() {
    let app = app();
    let session = register_and_login(&app, "a@b.com").await;
    assert!(!session.is_chirpy_red);

    let response = send(
        &app,
        Method::POST,
        "/api/polka/webhooks",
        None,
        Some(json!({"event": "user.upgraded", "data": {"user_id": session.id}})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let credentials = json!({"email": "a@b.com", "password": "pw12345"});
    let response = send(&app, Method::POST, "/api/login", None, Some(credentials)).await;
    let session: LoginResponse = read_json(response).await;
    assert!(session.is_chirpy_red);
}

#[tokio::test]
async fn test_login_with_empty_fields_is_bad_request() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "", "password": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
