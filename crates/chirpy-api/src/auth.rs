//! Axum용 인증 추출기.
//!
//! `Authorization` 헤더를 `AuthorizationGate`로 검증하여 요청 주체를 핸들러에 전달합니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::error::{auth_error, ApiError};
use crate::metrics::record_auth_result;
use crate::state::AppState;

/// 인증된 사용자 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(AuthUser(user_id): AuthUser) -> impl IntoResponse {
///     format!("Authenticated user: {}", user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// `Authorization` 헤더 값.
///
/// UTF-8이 아닌 값은 빈 문자열로 취급되어 형식 오류로 거부됩니다.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or(""))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let result = state.gate.authorize(authorization_header(&parts.headers));
        record_auth_result("authorize", &result);

        result.map(AuthUser).map_err(auth_error)
    }
}
