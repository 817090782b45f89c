//! Refresh Token 발급, 교환, 폐기.
//!
//! Refresh Token은 불투명한 난수 문자열이며 서버 저장소가 상태를 추적합니다.
//! 교환(redeem)은 토큰을 소모하지 않으므로 만료 또는 폐기 전까지 반복 사용할 수 있습니다.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Clock, RefreshTokenRecord, RefreshTokenRepository};
use crate::error::{with_store_timeout, AuthError, StoreError};

/// 토큰 생성에 사용하는 난수 바이트 수 (hex 인코딩 시 64자).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Refresh Token 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("Refresh Token을 찾을 수 없음")]
    NotFound,
    #[error("Refresh Token이 만료되었습니다")]
    Expired,
    #[error("Refresh Token이 폐기되었습니다")]
    Revoked,
    #[error("난수 생성 실패")]
    RandomSource,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RefreshTokenError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RefreshTokenError::RandomSource
                | RefreshTokenError::Store(StoreError::Timeout)
                | RefreshTokenError::Store(StoreError::Backend(_))
        )
    }
}

impl From<RefreshTokenError> for AuthError {
    fn from(err: RefreshTokenError) -> Self {
        match err {
            RefreshTokenError::NotFound => AuthError::NotFound,
            RefreshTokenError::Expired => AuthError::Expired,
            RefreshTokenError::Revoked => AuthError::Revoked,
            RefreshTokenError::RandomSource => AuthError::Internal("난수 생성 실패".to_string()),
            RefreshTokenError::Store(e) => e.into(),
        }
    }
}

/// OS 난수 생성기로 새 토큰 값을 만듭니다.
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| RefreshTokenError::RandomSource)?;
    Ok(hex::encode(bytes))
}

/// Refresh Token 서비스.
///
/// 저장소 호출은 모두 `store_timeout`으로 제한됩니다.
#[derive(Clone)]
pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
    store_timeout: std::time::Duration,
}

impl RefreshTokenStore {
    pub fn new(
        repo: Arc<dyn RefreshTokenRepository>,
        clock: Arc<dyn Clock>,
        lifetime: Duration,
        store_timeout: std::time::Duration,
    ) -> Self {
        Self {
            repo,
            clock,
            lifetime,
            store_timeout,
        }
    }

    /// 사용자에게 새 Refresh Token 발급.
    ///
    /// # Errors
    ///
    /// - `RandomSource`: OS 난수 생성기 실패
    /// - `Store`: 저장 실패 또는 시간 초과
    pub async fn issue(&self, user_id: Uuid) -> Result<RefreshTokenRecord, RefreshTokenError> {
        let token = generate_refresh_token()?;
        let now = self.clock.now();

        let record = RefreshTokenRecord {
            token,
            user_id,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            revoked_at: None,
        };

        with_store_timeout(self.store_timeout, self.repo.insert(&record)).await?;

        debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token issued");
        Ok(record)
    }

    /// 토큰을 검증하고 소유자 ID를 반환합니다.
    ///
    /// 존재 → 만료 → 폐기 순으로 확인하며, 토큰 상태는 바꾸지 않습니다.
    pub async fn redeem(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        let record = with_store_timeout(self.store_timeout, self.repo.find(token))
            .await?
            .ok_or(RefreshTokenError::NotFound)?;

        if record.is_expired_at(self.clock.now()) {
            return Err(RefreshTokenError::Expired);
        }

        if record.is_revoked() {
            return Err(RefreshTokenError::Revoked);
        }

        Ok(record.user_id)
    }

    /// 토큰 폐기.
    ///
    /// 이미 폐기된 토큰은 최초 폐기 시각을 유지한 채 성공합니다.
    /// 한 번도 발급되지 않은 토큰이면 `NotFound`.
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        let now = self.clock.now();
        let existed = with_store_timeout(self.store_timeout, self.repo.revoke(token, now)).await?;

        if !existed {
            return Err(RefreshTokenError::NotFound);
        }

        Ok(())
    }

    /// 모든 토큰 삭제 (관리자 리셋).
    pub async fn reset(&self) -> Result<u64, RefreshTokenError> {
        Ok(with_store_timeout(self.store_timeout, self.repo.reset()).await?)
    }
}
