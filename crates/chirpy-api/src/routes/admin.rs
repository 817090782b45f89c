//! 관리자 endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chirpy_core::{with_store_timeout, AuthError};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::error::{api_error, auth_error, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 리셋 결과.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResetResponse {
    /// 삭제된 사용자 수
    pub users_deleted: u64,
}

/// 모든 사용자, 세션, 게시글 삭제.
///
/// `platform`이 "dev"일 때만 허용됩니다.
#[utoipa::path(
    post,
    path = "/admin/reset",
    responses(
        (status = 200, description = "리셋 완료", body = ResetResponse),
        (status = 403, description = "개발 환경이 아님", body = ApiErrorResponse)
    ),
    tag = "admin"
)]
pub async fn reset(State(state): State<Arc<AppState>>) -> ApiResult<Json<ResetResponse>> {
    if !state.is_dev() {
        warn!(platform = %state.platform, "Reset rejected outside dev platform");
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Reset is only allowed in dev environment",
        ));
    }

    // 인메모리 모드에는 CASCADE가 없으므로 게시글부터 직접 삭제
    with_store_timeout(state.store_timeout, state.chirps.reset())
        .await
        .map_err(|e| auth_error(AuthError::from(e)))?;
    let users_deleted = state.gate.reset().await.map_err(auth_error)?;

    Ok(Json(ResetResponse { users_deleted }))
}

/// 관리자 라우터 생성.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/reset", post(reset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::read_json;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::Request;
    use chirpy_core::AuthConfig;
    use tower::ServiceExt;

    fn reset_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/reset")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let state = Arc::new(create_test_state());
        let user = state.gate.register("a@b.com", "pw12345").await.unwrap();
        let session = state.gate.login("a@b.com", "pw12345").await.unwrap();
        state.chirps.create(user.id, "hello").await.unwrap();

        let response = admin_router()
            .with_state(state.clone())
            .oneshot(reset_request())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ResetResponse = read_json(response).await;
        assert_eq!(body.users_deleted, 1);

        assert!(state.gate.login("a@b.com", "pw12345").await.is_err());
        let refresh_header = format!("Bearer {}", session.refresh_token);
        assert!(state.gate.refresh(Some(&refresh_header)).await.is_err());
        assert!(state
            .chirps
            .list(None, Default::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_reset_forbidden_outside_dev() {
        let state = Arc::new(AppState::in_memory(&AuthConfig::new("secret"), "prod"));

        let response = admin_router()
            .with_state(state)
            .oneshot(reset_request())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
