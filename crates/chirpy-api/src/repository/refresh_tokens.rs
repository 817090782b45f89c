//! Refresh Tokens Repository
//!
//! Refresh Token 상태를 PostgreSQL에 저장합니다.

use async_trait::async_trait;
use chirpy_core::{RefreshTokenRecord, RefreshTokenRepository, StoreError};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::store_error;

/// 최초 폐기 시에만 `revoked_at`과 `updated_at`을 기록합니다. 재폐기는 행을 바꾸지 않습니다.
const REVOKE_SQL: &str = r#"
    UPDATE refresh_tokens
    SET revoked_at = COALESCE(revoked_at, $2),
        updated_at = CASE WHEN revoked_at IS NULL THEN $2 ELSE updated_at END
    WHERE token = $1
"#;

/// PostgreSQL Refresh Token 저장소.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $3, $4, $5)
            "#,
        )
        .bind(&record.token)
        .bind(record.user_id)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.revoked_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT token, user_id, created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)
    }

    /// 단일 UPDATE 문으로 원자적으로 폐기합니다.
    async fn revoke(&self, token: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let result = sqlx::query(REVOKE_SQL)
            .bind(token)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM refresh_tokens")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected())
    }
}
