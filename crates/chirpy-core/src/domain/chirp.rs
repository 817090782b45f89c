//! 게시글(chirp) 레코드와 저장소 trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// 게시글 최대 길이 (문자 수).
pub const MAX_CHIRP_LENGTH: usize = 140;

/// 가려지는 단어 (대소문자 무시).
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// 공백으로 나눈 단어 중 금칙어를 `****`로 바꿉니다.
///
/// 구두점이 붙은 단어(`"Sharbert!"`)는 그대로 둡니다.
pub fn clean_chirp_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if PROFANE_WORDS.contains(&lower.as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 목록 정렬 순서 (작성 시각 기준).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// 게시글 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct ChirpRecord {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 게시글 저장소.
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChirpRecord>, StoreError>;

    /// 게시글 목록. `author`가 있으면 해당 사용자 글만.
    async fn list(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<ChirpRecord>, StoreError>;

    /// 삭제된 경우 `true`.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn reset(&self) -> Result<u64, StoreError>;
}
