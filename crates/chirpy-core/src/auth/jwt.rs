//! JWT Access Token 처리.
//!
//! HS256으로 서명된 무상태 Access Token 발급/검증. 서버 저장소를 사용하지 않으며,
//! 유효성은 서명과 현재 시각만으로 결정됩니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 발급자(`iss`) 고정값.
pub const TOKEN_ISSUER: &str = "chirpy";

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer - 항상 [`TOKEN_ISSUER`]
    pub iss: String,
    /// Subject - 사용자 ID
    pub sub: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 같은 초에 발급된 토큰도 서로 다르도록
    #[serde(default)]
    pub jti: String,
}

impl AccessClaims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `now` - 발급 시각
    /// * `ttl` - 수명 (0 또는 음수면 즉시 만료)
    pub fn new(user_id: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// `now >= exp`이면 만료. 경계 시각은 무효 쪽에 속합니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Access Token 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessTokenError {
    #[error("서명 키가 비어 있습니다")]
    EmptySecret,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(String),
    #[error("서명이 유효하지 않습니다")]
    BadSignature,
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("잘못된 subject")]
    BadSubject,
    #[error("잘못된 발급자")]
    InvalidIssuer,
}

/// Access Token 발급.
///
/// # Arguments
///
/// * `user_id` - 사용자 ID
/// * `secret` - HMAC 서명 키 (비어 있으면 `EmptySecret`)
/// * `ttl` - 수명
///
/// # Returns
///
/// `header.claims.signature` 형식의 JWT 문자열
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
) -> Result<String, AccessTokenError> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// 발급 시각을 지정하여 Access Token 발급.
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AccessTokenError> {
    if secret.is_empty() {
        return Err(AccessTokenError::EmptySecret);
    }

    let claims = AccessClaims::new(user_id, now, ttl);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AccessTokenError::Encoding(e.to_string()))
}

/// Access Token 검증 후 사용자 ID 반환.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AccessTokenError> {
    validate_access_token_at(token, secret, Utc::now())
}

/// 현재 시각을 지정하여 Access Token 검증.
///
/// 서명 → 발급자 → 만료 → subject 순으로 확인합니다.
pub fn validate_access_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, AccessTokenError> {
    let claims = decode_access_claims(token, secret)?;

    if claims.is_expired_at(now) {
        return Err(AccessTokenError::Expired);
    }

    Uuid::parse_str(&claims.sub).map_err(|_| AccessTokenError::BadSubject)
}

/// 서명과 발급자만 검증하고 Claims를 반환합니다. 만료는 확인하지 않습니다.
///
/// 세 부분(`a.b.c`)으로 나뉘지 않는 문자열은 `Malformed`, 그 외 변조된 토큰은
/// 어느 부분이 바뀌었든 `BadSignature`로 보고합니다.
pub fn decode_access_claims(token: &str, secret: &str) -> Result<AccessClaims, AccessTokenError> {
    if secret.is_empty() {
        return Err(AccessTokenError::EmptySecret);
    }

    if !is_compact_token(token) {
        return Err(AccessTokenError::Malformed);
    }

    // 만료는 `now >= exp` 규칙으로 직접 판정
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidIssuer => AccessTokenError::InvalidIssuer,
        ErrorKind::InvalidToken | ErrorKind::MissingRequiredClaim(_) => AccessTokenError::Malformed,
        _ => AccessTokenError::BadSignature,
    })
}

fn is_compact_token(token: &str) -> bool {
    let mut parts = 0;
    for part in token.split('.') {
        if part.is_empty() {
            return false;
        }
        parts += 1;
    }
    parts == 3
}
