//! Chirps Repository
//!
//! 게시글 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use chirpy_core::{ChirpRecord, ChirpStore, SortOrder, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use super::store_error;

/// PostgreSQL 게시글 저장소.
#[derive(Debug, Clone)]
pub struct PgChirpStore {
    pool: PgPool,
}

impl PgChirpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChirpStore for PgChirpStore {
    async fn create(&self, user_id: Uuid, body: &str) -> Result<ChirpRecord, StoreError> {
        sqlx::query_as::<_, ChirpRecord>(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChirpRecord>, StoreError> {
        sqlx::query_as::<_, ChirpRecord>("SELECT * FROM chirps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn list(
        &self,
        author: Option<Uuid>,
        order: SortOrder,
    ) -> Result<Vec<ChirpRecord>, StoreError> {
        let sql = match order {
            SortOrder::Asc => {
                "SELECT * FROM chirps WHERE ($1::uuid IS NULL OR user_id = $1) ORDER BY created_at ASC, id ASC"
            }
            SortOrder::Desc => {
                "SELECT * FROM chirps WHERE ($1::uuid IS NULL OR user_id = $1) ORDER BY created_at DESC, id DESC"
            }
        };

        sqlx::query_as::<_, ChirpRecord>(sql)
            .bind(author)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM chirps")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }
}
