//! 인증 서브시스템의 에러 타입.
//!
//! 컴포넌트별 에러(`PasswordError`, `BearerError` 등)는 각 모듈에 정의되고,
//! 호출자에게 노출되는 최종 결과는 이 모듈의 닫힌 분류 [`AuthError`]로 수렴합니다.

use thiserror::Error;

/// 인증/인가 작업의 최종 에러 분류.
///
/// 호출자는 문자열 비교 대신 variant로 분기합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 인증 실패 (토큰/헤더/자격증명 문제를 구분하지 않음)
    #[error("인증이 필요합니다")]
    Unauthorized,

    /// 인증은 되었으나 리소스 소유자가 아님
    #[error("권한이 없습니다")]
    Forbidden,

    /// 대상 리소스 없음
    #[error("찾을 수 없음")]
    NotFound,

    /// 만료된 토큰
    #[error("토큰이 만료되었습니다")]
    Expired,

    /// 폐기된 토큰
    #[error("토큰이 폐기되었습니다")]
    Revoked,

    /// 잘못된 입력 형식
    #[error("잘못된 형식: {0}")]
    Malformed(String),

    /// 잘못된 설정 (시작 시점 치명적 에러)
    #[error("잘못된 설정: {0}")]
    InvalidConfiguration(String),

    /// 이미 존재하는 리소스 (중복 이메일 등)
    #[error("이미 존재합니다")]
    Conflict,

    /// 내부 에러 (저장소 장애, 난수 생성 실패 등)
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Internal(_))
    }
}

/// 영속 저장소 에러.
///
/// `UserCredentialStore`, `RefreshTokenRepository`, `ChirpStore` 구현체가 반환합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 유일성 제약 위반
    #[error("중복된 레코드")]
    Conflict,

    /// 대상 레코드 없음
    #[error("레코드를 찾을 수 없음")]
    NotFound,

    /// 저장소 호출 시간 초과
    #[error("저장소 응답 시간 초과")]
    Timeout,

    /// 백엔드 에러
    #[error("저장소 에러: {0}")]
    Backend(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => AuthError::Conflict,
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Timeout | StoreError::Backend(_) => AuthError::Internal(err.to_string()),
        }
    }
}

/// 저장소 호출에 타임아웃을 적용합니다.
///
/// 요청 단위 데드라인을 저장소까지 전파하기 위해 모든 저장소 호출은 이 함수를 거칩니다.
pub async fn with_store_timeout<T, F>(timeout: std::time::Duration, fut: F) -> Result<T, StoreError>
where
    F: std::future::Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout),
    }
}
