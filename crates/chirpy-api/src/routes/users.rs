//! 사용자 등록 및 자격증명 변경 endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chirpy_core::UserRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{auth_error, validation_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_auth_result;
use crate::state::AppState;

/// 이메일/비밀번호 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    #[validate(email(message = "유효한 이메일 주소가 아닙니다"))]
    pub email: String,
    #[validate(length(min = 1, message = "비밀번호가 필요합니다"))]
    pub password: String,
}

/// 사용자 응답 (비밀번호 해시 제외).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    /// Chirpy Red 멤버십 여부
    pub is_chirpy_red: bool,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// 사용자 등록.
///
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "등록 성공", body = UserResponse),
        (status = 400, description = "입력 검증 실패", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    request.validate().map_err(validation_error)?;

    let result = state.gate.register(&request.email, &request.password).await;
    record_auth_result("register", &result);

    let user = result.map_err(auth_error)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 인증된 사용자의 이메일과 비밀번호 변경.
///
/// PUT /api/users
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "변경 성공", body = UserResponse),
        (status = 400, description = "입력 검증 실패", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<Json<UserResponse>> {
    request.validate().map_err(validation_error)?;

    let result = state
        .gate
        .update_credentials(user_id, &request.email, &request.password)
        .await;
    record_auth_result("update_credentials", &result);

    Ok(Json(result.map_err(auth_error)?.into()))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(create_user).put(update_user))
}
