//! 로그인 및 세션 토큰 endpoint.
//!
//! - `POST /api/login`: Access Token과 Refresh Token 발급
//! - `POST /api/refresh`: Refresh Token으로 새 Access Token 발급
//! - `POST /api/revoke`: Refresh Token 폐기

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::users::CredentialsRequest;
use crate::auth::authorization_header;
use crate::error::{auth_error, validation_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_auth_result;
use crate::state::AppState;

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    /// Access Token (JWT)
    pub token: String,
    /// Refresh Token (hex 64자)
    pub refresh_token: String,
}

/// 토큰 갱신 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub token: String,
}

/// 이메일/비밀번호 로그인.
///
/// 이메일이 없거나 비밀번호가 틀리면 같은 401을 반환합니다.
/// 빈 필드는 인증 전에 400으로 거부됩니다.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "필수 필드 누락 또는 형식 오류", body = ApiErrorResponse),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<Json<LoginResponse>> {
    request.validate().map_err(validation_error)?;

    let result = state.gate.login(&request.email, &request.password).await;
    record_auth_result("login", &result);

    let outcome = result.map_err(auth_error)?;
    Ok(Json(LoginResponse {
        id: outcome.user.id,
        created_at: outcome.user.created_at,
        updated_at: outcome.user.updated_at,
        email: outcome.user.email,
        is_chirpy_red: outcome.user.is_chirpy_red,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// Refresh Token으로 새 Access Token 발급.
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "갱신 성공", body = RefreshResponse),
        (status = 401, description = "토큰 누락, 만료, 폐기 또는 미발급", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let result = state.gate.refresh(authorization_header(&headers)).await;
    record_auth_result("refresh", &result);

    let token = result.map_err(auth_error)?;
    Ok(Json(RefreshResponse { token }))
}

/// Refresh Token 폐기.
///
/// 이미 폐기된 토큰을 다시 폐기해도 204를 반환합니다.
#[utoipa::path(
    post,
    path = "/api/revoke",
    responses(
        (status = 204, description = "폐기 완료"),
        (status = 401, description = "토큰 누락 또는 형식 오류", body = ApiErrorResponse),
        (status = 404, description = "발급된 적 없는 토큰", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "sessions"
)]
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let result = state.gate.revoke_session(authorization_header(&headers)).await;
    record_auth_result("revoke", &result);

    result.map_err(auth_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// 세션 라우터 생성.
pub fn sessions_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/revoke", post(revoke))
}
