//! PostgreSQL 저장소.
//!
//! `chirpy-core`의 저장소 trait를 sqlx로 구현합니다.
//! 스키마는 `migrations/` 디렉터리에 있으며 서버 시작 시 적용됩니다.

mod chirps;
mod refresh_tokens;
mod users;

pub use chirps::PgChirpStore;
pub use refresh_tokens::PgRefreshTokenRepository;
pub use users::PgUserStore;

use chirpy_core::StoreError;

/// sqlx 에러를 저장소 에러로 변환합니다.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::PoolTimedOut => StoreError::Timeout,
        _ => StoreError::Backend(err.to_string()),
    }
}
