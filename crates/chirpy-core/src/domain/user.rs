//! 사용자 자격증명 레코드와 저장소 trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;

/// 사용자 자격증명 레코드.
///
/// `hashed_password`는 직렬화되지 않으며 `Debug` 출력에서도 가려집니다.
#[derive(Clone, Serialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// 유료 멤버십(Chirpy Red) 여부
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("hashed_password", &"[REDACTED]")
            .field("is_chirpy_red", &self.is_chirpy_red)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// 사용자 자격증명 저장소.
///
/// 사용자당 자격증명은 하나이며, 변경 시 통째로 교체됩니다.
#[async_trait]
pub trait UserCredentialStore: Send + Sync {
    /// 이메일로 사용자 조회.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// ID로 사용자 조회.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// 사용자 생성.
    ///
    /// # Errors
    ///
    /// 이메일이 이미 존재하면 `StoreError::Conflict`.
    async fn create(&self, email: &str, hashed_password: &str) -> Result<UserRecord, StoreError>;

    /// 이메일과 비밀번호 해시를 함께 교체.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 사용자 없음
    /// - `StoreError::Conflict`: 다른 사용자가 이미 쓰는 이메일
    async fn update_credential(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserRecord, StoreError>;

    /// Chirpy Red 멤버십 부여. 이미 부여된 사용자에게는 no-op입니다.
    ///
    /// # Errors
    ///
    /// 사용자가 없으면 `StoreError::NotFound`.
    async fn upgrade(&self, id: Uuid) -> Result<UserRecord, StoreError>;

    /// 모든 사용자 삭제 (관리자 리셋). 연관 레코드도 함께 삭제됩니다.
    async fn reset(&self) -> Result<u64, StoreError>;
}
