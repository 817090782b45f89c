//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::{http::StatusCode, Json};
use chirpy_core::AuthError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "UNAUTHORIZED",
///   "message": "Unauthorized",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UNAUTHORIZED", "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    ///
    /// ```
    /// use chirpy_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("NOT_FOUND", "Chirp not found");
    /// assert_eq!(error.code(), "NOT_FOUND");
    /// ```
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 에러 타입.
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 상태 코드와 에러 코드로 응답을 만듭니다.
pub fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// `AuthError`를 HTTP 응답으로 변환합니다.
///
/// 인증 실패는 원인과 관계없이 같은 401 본문을 돌려주고,
/// 내부 에러의 상세 내용은 로그에만 남깁니다.
pub fn auth_error(err: AuthError) -> ApiError {
    match err {
        AuthError::Unauthorized | AuthError::Expired | AuthError::Revoked => {
            api_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized")
        }
        AuthError::Forbidden => api_error(StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden"),
        AuthError::NotFound => api_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Not found"),
        AuthError::Malformed(message) => {
            api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
        AuthError::Conflict => api_error(StatusCode::CONFLICT, "CONFLICT", "Already exists"),
        AuthError::InvalidConfiguration(detail) | AuthError::Internal(detail) => {
            error!(error = %detail, "Internal error while handling request");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            )
        }
    }
}

/// `validator` 검증 실패를 400 응답으로 변환합니다.
///
/// `details`에는 필드별 메시지 목록이 담깁니다.
pub fn validation_error(errors: ValidationErrors) -> ApiError {
    let fields: serde_json::Map<String, Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
                })
                .collect::<Vec<_>>();
            (field.to_string(), Value::from(messages))
        })
        .collect();

    let message = fields
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
        .collect::<Vec<_>>()
        .join("; ");

    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::with_details(
            "VALIDATION_ERROR",
            message,
            Value::Object(fields),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_api_error_response_with_details() {
        let details = serde_json::json!({"field": "email"});
        let error = ApiErrorResponse::with_details("VALIDATION_ERROR", "Invalid input", details);
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.details.is_some());

        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains(r#""field":"email""#));
    }

    #[test]
    fn test_auth_failures_share_one_response() {
        let (status_a, Json(body_a)) = auth_error(AuthError::Unauthorized);
        let (status_b, Json(body_b)) = auth_error(AuthError::Expired);
        let (status_c, Json(body_c)) = auth_error(AuthError::Revoked);

        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
        assert_eq!(status_a, status_b);
        assert_eq!(status_b, status_c);
        assert_eq!(body_a.message, body_b.message);
        assert_eq!(body_b.message, body_c.message);
    }

    #[test]
    fn test_auth_error_status_mapping() {
        assert_eq!(auth_error(AuthError::Forbidden).0, StatusCode::FORBIDDEN);
        assert_eq!(auth_error(AuthError::NotFound).0, StatusCode::NOT_FOUND);
        assert_eq!(auth_error(AuthError::Conflict).0, StatusCode::CONFLICT);
        assert_eq!(
            auth_error(AuthError::Malformed("x".into())).0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_validation_error_lists_fields() {
        use validator::ValidationError;

        let mut errors = ValidationErrors::new();
        errors.add(
            "email",
            ValidationError::new("email").with_message("Email is required".into()),
        );

        let (status, Json(body)) = validation_error(errors);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Email is required");
        assert_eq!(
            body.details,
            Some(serde_json::json!({"email": ["Email is required"]}))
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let (status, Json(body)) = auth_error(AuthError::Internal("pool timed out".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "INTERNAL_ERROR");
        assert!(!body.message.contains("pool"));
    }
}
