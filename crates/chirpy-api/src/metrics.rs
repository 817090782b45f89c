//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 인증 결과 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// # Errors
///
/// 레코더가 이미 설치되어 있으면 `BuildError`를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭 헬퍼 함수
// ============================================================================

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 인증 메트릭 헬퍼 함수
// ============================================================================

/// 인증 작업 결과 카운터 증가.
///
/// * `operation` - "login", "authorize", "refresh", "revoke" 등
/// * `outcome` - "success" 또는 실패 분류 ("unauthorized", "not_found", "internal" ...)
pub fn record_auth_outcome(operation: &'static str, outcome: &'static str) {
    counter!(
        "auth_outcomes_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// 401/403으로 끝난 HTTP 요청 카운터 증가.
pub fn record_access_denied(path: &str, status: u16) {
    counter!(
        "http_access_denied_total",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// `AuthResult`의 결과를 분류하여 기록합니다.
pub fn record_auth_result<T>(operation: &'static str, result: &chirpy_core::AuthResult<T>) {
    use chirpy_core::AuthError;

    let outcome = match result {
        Ok(_) => "success",
        Err(AuthError::Unauthorized | AuthError::Expired | AuthError::Revoked) => "unauthorized",
        Err(AuthError::Forbidden) => "forbidden",
        Err(AuthError::NotFound) => "not_found",
        Err(AuthError::Conflict) => "conflict",
        Err(AuthError::Malformed(_)) => "malformed",
        Err(AuthError::InvalidConfiguration(_) | AuthError::Internal(_)) => "internal",
    };
    record_auth_outcome(operation, outcome);
}

// ============================================================================
// 경로 정규화 유틸리티
// ============================================================================

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 예: `/api/chirps/123e4567-e89b-12d3-a456-426614174000` → `/api/chirps/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_uuid = segment.len() == 36 && segment.chars().filter(|c| *c == '-').count() == 4;
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());

            if is_uuid || is_numeric {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
