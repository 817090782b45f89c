//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.

use std::sync::Arc;

use chirpy_core::store::memory::{
    InMemoryChirpStore, InMemoryRefreshTokenRepository, InMemoryUserStore,
};
use chirpy_core::{AuthConfig, AuthorizationGate, ChirpStore, SystemClock};
use sqlx::PgPool;

use crate::repository::{PgChirpStore, PgRefreshTokenRepository, PgUserStore};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 인증/인가 게이트
    pub gate: Arc<AuthorizationGate>,

    /// 게시글 저장소
    pub chirps: Arc<dyn ChirpStore>,

    /// 데이터베이스 연결 풀 (인메모리 모드에서는 None)
    pub db_pool: Option<PgPool>,

    /// 실행 플랫폼 ("dev"일 때만 관리자 리셋 허용)
    pub platform: String,

    /// 저장소 호출 타임아웃
    pub store_timeout: std::time::Duration,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// PostgreSQL 저장소로 상태를 생성합니다.
    pub fn with_postgres(auth: &AuthConfig, pool: PgPool, platform: impl Into<String>) -> Self {
        let gate = AuthorizationGate::new(
            auth,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgRefreshTokenRepository::new(pool.clone())),
            Arc::new(SystemClock),
        );

        Self::build(
            auth,
            gate,
            Arc::new(PgChirpStore::new(pool.clone())),
            Some(pool),
            platform.into(),
        )
    }

    /// 인메모리 저장소로 상태를 생성합니다.
    ///
    /// 프로세스가 종료되면 모든 데이터가 사라집니다.
    pub fn in_memory(auth: &AuthConfig, platform: impl Into<String>) -> Self {
        let gate = AuthorizationGate::new(
            auth,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryRefreshTokenRepository::new()),
            Arc::new(SystemClock),
        );

        Self::build(
            auth,
            gate,
            Arc::new(InMemoryChirpStore::new()),
            None,
            platform.into(),
        )
    }

    fn build(
        auth: &AuthConfig,
        gate: AuthorizationGate,
        chirps: Arc<dyn ChirpStore>,
        db_pool: Option<PgPool>,
        platform: String,
    ) -> Self {
        Self {
            gate: Arc::new(gate),
            chirps,
            db_pool,
            platform,
            store_timeout: auth.store_timeout(),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 개발 플랫폼 여부.
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

/// 테스트용 AppState 생성.
///
/// 인메모리 저장소, "dev" 플랫폼, 최소 비용 비밀번호 해싱을 사용합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use chirpy_core::PasswordPolicy;

    let auth = AuthConfig::new("test-secret-key").with_password_policy(PasswordPolicy::new(8, 1, 1));
    AppState::in_memory(&auth, "dev")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_state() {
        let state = create_test_state();
        assert!(state.db_pool.is_none());
        assert!(state.is_dev());
        assert!(!state.version.is_empty());
        assert!(state.uptime_secs() >= 0);
    }

    #[tokio::test]
    async fn test_db_health_without_pool() {
        let state = create_test_state();
        assert!(!state.is_db_healthy().await);
    }

    #[test]
    fn test_non_dev_platform() {
        let state = AppState::in_memory(&AuthConfig::new("secret"), "prod");
        assert!(!state.is_dev());
    }
}
