//! 게시글 endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chirpy_core::{
    clean_chirp_body, with_store_timeout, AuthError, ChirpRecord, SortOrder, StoreError,
    MAX_CHIRP_LENGTH,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::auth::AuthUser;
use crate::error::{api_error, auth_error, validation_error, ApiError, ApiErrorResponse, ApiResult};
use crate::state::AppState;

fn validate_chirp_length(body: &str) -> Result<(), ValidationError> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ValidationError::new("chirp_too_long").with_message("Chirp is too long".into()));
    }
    Ok(())
}

/// 게시글 작성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChirpRequest {
    /// 본문 (최대 140자)
    #[validate(custom(function = "validate_chirp_length"))]
    pub body: String,
}

/// 게시글 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<ChirpRecord> for ChirpResponse {
    fn from(chirp: ChirpRecord) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

/// 목록 조회 쿼리.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListChirpsQuery {
    /// 작성자 ID
    pub author_id: Option<String>,
    /// 정렬 순서 ("asc" | "desc", 기본: asc)
    pub sort: Option<String>,
}

fn store_failure(err: StoreError) -> ApiError {
    auth_error(AuthError::from(err))
}

fn parse_chirp_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Invalid chirp ID"))
}

fn parse_sort(raw: Option<&str>) -> ApiResult<SortOrder> {
    match raw {
        None | Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(_) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "sort must be 'asc' or 'desc'",
        )),
    }
}

/// 게시글 작성.
///
/// 금칙어는 `****`로 가려서 저장합니다.
#[utoipa::path(
    post,
    path = "/api/chirps",
    request_body = CreateChirpRequest,
    responses(
        (status = 201, description = "작성 성공", body = ChirpResponse),
        (status = 400, description = "본문이 너무 김", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "chirps"
)]
pub async fn create_chirp(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateChirpRequest>,
) -> ApiResult<(StatusCode, Json<ChirpResponse>)> {
    request.validate().map_err(validation_error)?;

    let body = clean_chirp_body(&request.body);
    let chirp = with_store_timeout(state.store_timeout, state.chirps.create(user_id, &body))
        .await
        .map_err(store_failure)?;

    Ok((StatusCode::CREATED, Json(chirp.into())))
}

/// 게시글 목록.
#[utoipa::path(
    get,
    path = "/api/chirps",
    params(ListChirpsQuery),
    responses(
        (status = 200, description = "목록 조회 성공", body = Vec<ChirpResponse>),
        (status = 400, description = "잘못된 쿼리", body = ApiErrorResponse)
    ),
    tag = "chirps"
)]
pub async fn list_chirps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListChirpsQuery>,
) -> ApiResult<Json<Vec<ChirpResponse>>> {
    let order = parse_sort(query.sort.as_deref())?;
    let author = query
        .author_id
        .as_deref()
        .map(|raw| {
            Uuid::parse_str(raw).map_err(|_| {
                api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Invalid author ID")
            })
        })
        .transpose()?;

    let chirps = with_store_timeout(state.store_timeout, state.chirps.list(author, order))
        .await
        .map_err(store_failure)?;

    Ok(Json(chirps.into_iter().map(ChirpResponse::from).collect()))
}

/// 게시글 단건 조회.
#[utoipa::path(
    get,
    path = "/api/chirps/{id}",
    params(("id" = String, Path, description = "게시글 ID (UUID)")),
    responses(
        (status = 200, description = "조회 성공", body = ChirpResponse),
        (status = 400, description = "잘못된 ID", body = ApiErrorResponse),
        (status = 404, description = "게시글 없음", body = ApiErrorResponse)
    ),
    tag = "chirps"
)]
pub async fn get_chirp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChirpResponse>> {
    let id = parse_chirp_id(&id)?;

    let chirp = with_store_timeout(state.store_timeout, state.chirps.find_by_id(id))
        .await
        .map_err(store_failure)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Chirp not found"))?;

    Ok(Json(chirp.into()))
}

/// 게시글 삭제 (작성자만 가능).
#[utoipa::path(
    delete,
    path = "/api/chirps/{id}",
    params(("id" = String, Path, description = "게시글 ID (UUID)")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "작성자가 아님", body = ApiErrorResponse),
        (status = 404, description = "게시글 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "chirps"
)]
pub async fn delete_chirp(
    AuthUser(user_id): AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_chirp_id(&id)?;

    let chirp = with_store_timeout(state.store_timeout, state.chirps.find_by_id(id))
        .await
        .map_err(store_failure)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Chirp not found"))?;

    state
        .gate
        .ensure_owner(user_id, chirp.user_id)
        .map_err(auth_error)?;

    // 조회와 삭제 사이에 다른 요청이 먼저 지웠을 수 있음
    let deleted = with_store_timeout(state.store_timeout, state.chirps.delete(id))
        .await
        .map_err(store_failure)?;
    if !deleted {
        return Err(api_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Chirp not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// 게시글 라우터 생성.
pub fn chirps_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chirps", get(list_chirps).post(create_chirp))
        .route("/chirps/{id}", get(get_chirp).delete(delete_chirp))
}
