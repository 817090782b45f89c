//! 자격증명과 세션 토큰.
//!
//! # 구성 요소
//!
//! - [`password`]: Argon2id 비밀번호 해싱/검증
//! - [`bearer`]: `Authorization: Bearer <token>` 헤더 파싱
//! - [`jwt`]: 무상태 Access Token 발급/검증
//! - [`refresh`]: 서버 추적 Refresh Token 발급/교환/폐기
//! - [`AuthorizationGate`]: 위 구성요소를 묶은 요청 인가
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let outcome = gate.login("a@b.com", "pw12345").await?;
//! let user_id = gate.authorize(Some(&format!("Bearer {}", outcome.access_token)))?;
//! ```

pub mod bearer;
mod gate;
pub mod jwt;
pub mod password;
pub mod refresh;

pub use bearer::{extract_bearer_token, BearerError, BEARER_PREFIX};
pub use gate::{AuthorizationGate, LoginOutcome};
pub use jwt::{
    issue_access_token, issue_access_token_at, validate_access_token, validate_access_token_at,
    AccessClaims, AccessTokenError, TOKEN_ISSUER,
};
pub use password::{hash_password, verify_password, PasswordError};
pub use refresh::{generate_refresh_token, RefreshTokenError, RefreshTokenStore};
