//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/api/healthz` - 헬스 체크 (liveness)
//! - `/api/readyz` - 상세 헬스 체크 (readiness)
//! - `/api/users` - 사용자 등록 및 자격증명 변경
//! - `/api/login`, `/api/refresh`, `/api/revoke` - 세션 토큰
//! - `/api/chirps` - 게시글
//! - `/api/polka/webhooks` - 결제 이벤트 수신
//! - `/admin/reset` - 개발용 데이터 초기화

pub mod admin;
pub mod chirps;
pub mod health;
pub mod sessions;
pub mod users;
pub mod webhooks;

pub use admin::{admin_router, ResetResponse};
pub use chirps::{chirps_router, ChirpResponse, CreateChirpRequest, ListChirpsQuery};
pub use health::{health_router, HealthResponse};
pub use sessions::{sessions_router, LoginResponse, RefreshResponse};
pub use users::{users_router, CredentialsRequest, UserResponse};
pub use webhooks::{webhooks_router, WebhookData, WebhookRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    let api = Router::new()
        .merge(health_router())
        .merge(users_router())
        .merge(sessions_router())
        .merge(chirps_router())
        .merge(webhooks_router());

    Router::new()
        .nest("/api", api)
        .nest("/admin", admin_router())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_api_router_mounts_under_prefix() {
        let app = create_api_router().with_state(Arc::new(create_test_state()));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
