//! Refresh Token 레코드와 영속 저장소 trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;

/// 서버가 추적하는 Refresh Token 레코드.
///
/// `revoked_at`은 한 번 설정되면 되돌릴 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// `now >= expires_at`이면 만료.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Refresh Token 영속 저장소.
///
/// 토큰 값이 기본 키입니다. 구현체는 `revoke`를 단일 레코드에 대한 원자적
/// read-modify-write로 수행해야 하며, 커밋된 폐기는 이후 모든 `find`에 보여야 합니다.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// 새 레코드 저장.
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), StoreError>;

    /// 토큰 값으로 조회.
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// `revoked_at`이 비어 있으면 `at`으로 설정합니다.
    ///
    /// 이미 폐기된 레코드는 변경하지 않습니다.
    /// 레코드가 존재했으면 `true`, 없었으면 `false`를 반환합니다.
    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, StoreError>;

    /// 모든 레코드 삭제 (관리자 리셋).
    async fn reset(&self) -> Result<u64, StoreError>;
}
