//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! 스펙 JSON은 `/api-docs/openapi.json` 경로에서 제공됩니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ApiErrorResponse;
use crate::routes::{
    ChirpResponse, CreateChirpRequest, CredentialsRequest, HealthResponse, LoginResponse,
    RefreshResponse, ResetResponse, UserResponse, WebhookData, WebhookRequest,
};

// ==================== OpenAPI 문서 정의 ====================

/// Chirpy API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chirpy API",
        description = r#"
# Chirpy REST API

짧은 게시글(chirp)을 작성하고 조회하는 REST API입니다.

## 인증

- `POST /api/login`으로 Access Token(JWT)과 Refresh Token을 발급받습니다.
- 보호된 엔드포인트는 `Authorization: Bearer <access token>` 헤더가 필요합니다.
- `POST /api/refresh`, `POST /api/revoke`는 Refresh Token을 같은 헤더로 받습니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "users", description = "사용자 - 등록 및 자격증명 변경"),
        (name = "sessions", description = "세션 - 로그인, 토큰 갱신 및 폐기"),
        (name = "chirps", description = "게시글 - 작성, 조회, 삭제"),
        (name = "webhooks", description = "Webhook - 결제 이벤트 수신"),
        (name = "admin", description = "관리 - 개발용 데이터 초기화")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            ApiErrorResponse,
            HealthResponse,
            CredentialsRequest,
            UserResponse,
            LoginResponse,
            RefreshResponse,
            CreateChirpRequest,
            ChirpResponse,
            ResetResponse,
            WebhookRequest,
            WebhookData,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::users::create_user,
        crate::routes::users::update_user,
        crate::routes::sessions::login,
        crate::routes::sessions::refresh,
        crate::routes::sessions::revoke,
        crate::routes::chirps::create_chirp,
        crate::routes::chirps::list_chirps,
        crate::routes::chirps::get_chirp,
        crate::routes::chirps::delete_chirp,
        crate::routes::webhooks::polka_webhook,
        crate::routes::admin::reset,
    )
)]
pub struct ApiDoc;

/// Bearer 인증 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== 문서 라우터 ====================

/// OpenAPI JSON 라우터 생성.
///
/// `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

/// OpenAPI 스펙을 JSON 문자열로 반환합니다 (`--export-openapi`용).
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

// ==================== 테스트 ====================
