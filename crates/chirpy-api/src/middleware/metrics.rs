//! HTTP 요청 metrics middleware.
//!
//! 요청 수, 응답 상태, 처리 시간과 함께 인증/인가 거부 응답을 따로 집계합니다.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

use crate::metrics::{
    normalize_path, record_access_denied, record_http_duration, record_http_request,
    record_http_response,
};

/// 인증 누락/실패(401) 또는 소유자 불일치(403) 응답인지 확인합니다.
pub fn is_access_denied(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// HTTP 메트릭 미들웨어.
///
/// 라벨의 경로는 `normalize_path`로 정규화되어 ID별로 시계열이 늘어나지 않습니다.
/// - `http_requests_total{method, path}`
/// - `http_responses_total{method, path, status}`
/// - `http_request_duration_seconds{method, path}`
/// - `http_access_denied_total{path, status}`: 401/403 응답만
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    record_http_request(&method, &path);
    let response = next.run(request).await;

    let status = response.status();
    let elapsed = start.elapsed();
    record_http_response(&method, &path, status.as_u16());
    record_http_duration(&method, &path, elapsed.as_secs_f64());

    if is_access_denied(status) {
        record_access_denied(&path, status.as_u16());
        debug!(%method, %path, status = status.as_u16(), ?elapsed, "Access denied");
    }

    response
}
