//! 인가 게이트 통합 테스트
//!
//! 로그인 → 인가 → 갱신 → 폐기 전체 흐름과 저장소 장애 시 동작을 확인합니다.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chirpy_core::store::memory::{InMemoryRefreshTokenRepository, InMemoryUserStore};
use chirpy_core::{
    AuthConfig, AuthError, AuthorizationGate, PasswordPolicy, RefreshTokenRecord,
    RefreshTokenRepository, StoreError, SystemClock,
};

fn test_config() -> AuthConfig {
    AuthConfig::new("integration-secret").with_password_policy(PasswordPolicy::new(8, 1, 1))
}

fn gate_with(refresh_repo: Arc<dyn RefreshTokenRepository>) -> AuthorizationGate {
    AuthorizationGate::new(
        &test_config(),
        Arc::new(InMemoryUserStore::new()),
        refresh_repo,
        Arc::new(SystemClock),
    )
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let gate = gate_with(Arc::new(InMemoryRefreshTokenRepository::new()));
    let user = gate.register("a@b.com", "pw12345").await.unwrap();

    let outcome = gate.login("a@b.com", "pw12345").await.unwrap();
    assert_eq!(outcome.user.id, user.id);

    let principal = gate.authorize(Some(&bearer(&outcome.access_token))).unwrap();
    assert_eq!(principal, user.id);

    let refresh_header = bearer(&outcome.refresh_token);
    let new_access = gate.refresh(Some(&refresh_header)).await.unwrap();
    assert_eq!(gate.authorize(Some(&bearer(&new_access))), Ok(user.id));

    gate.revoke_session(Some(&refresh_header)).await.unwrap();
    assert_eq!(
        gate.refresh(Some(&refresh_header)).await.unwrap_err(),
        AuthError::Unauthorized
    );

    // 이미 발급된 Access Token은 만료 전까지 유효
    assert_eq!(gate.authorize(Some(&bearer(&new_access))), Ok(user.id));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let gate = gate_with(Arc::new(InMemoryRefreshTokenRepository::new()));
    gate.register("a@b.com", "pw12345").await.unwrap();

    let first = gate.login("a@b.com", "pw12345").await.unwrap();
    let second = gate.login("a@b.com", "pw12345").await.unwrap();
    assert_ne!(first.refresh_token, second.refresh_token);

    gate.revoke_session(Some(&bearer(&first.refresh_token)))
        .await
        .unwrap();

    assert!(gate
        .refresh(Some(&bearer(&second.refresh_token)))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_tokens_from_another_secret_are_rejected() {
    let gate = gate_with(Arc::new(InMemoryRefreshTokenRepository::new()));
    let other = AuthorizationGate::new(
        &AuthConfig::new("another-secret").with_password_policy(PasswordPolicy::new(8, 1, 1)),
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryRefreshTokenRepository::new()),
        Arc::new(SystemClock),
    );

    other.register("a@b.com", "pw12345").await.unwrap();
    let foreign = other.login("a@b.com", "pw12345").await.unwrap();

    assert_eq!(
        gate.authorize(Some(&bearer(&foreign.access_token))),
        Err(AuthError::Unauthorized)
    );
}

/// 항상 실패하는 저장소
struct BrokenRepository;

#[async_trait]
impl RefreshTokenRepository for BrokenRepository {
    async fn insert(&self, _record: &RefreshTokenRecord) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn find(&self, _token: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn revoke(&self, _token: &str, _at: DateTime<Utc>) -> Result<bool, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

/// 응답하지 않는 저장소
struct StalledRepository;

#[async_trait]
impl RefreshTokenRepository for StalledRepository {
    async fn insert(&self, _record: &RefreshTokenRecord) -> Result<(), StoreError> {
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        Ok(())
    }

    async fn find(&self, _token: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        Ok(None)
    }

    async fn revoke(&self, _token: &str, _at: DateTime<Utc>) -> Result<bool, StoreError> {
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        Ok(false)
    }

    async fn reset(&self) -> Result<u64, StoreError> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_store_failure_is_internal_not_unauthorized() {
    let gate = gate_with(Arc::new(BrokenRepository));
    gate.register("a@b.com", "pw12345").await.unwrap();

    let err = gate.login("a@b.com", "pw12345").await.unwrap_err();
    assert!(err.is_retryable());

    let err = gate.refresh(Some("Bearer whatever")).await.unwrap_err();
    assert!(matches!(err, AuthError::Internal(_)));

    let err = gate.revoke_session(Some("Bearer whatever")).await.unwrap_err();
    assert!(matches!(err, AuthError::Internal(_)));
}

#[tokio::test]
async fn test_stalled_store_times_out() {
    let config = test_config();
    let gate = AuthorizationGate::new(
        &AuthConfig {
            store_timeout_ms: 50,
            ..config
        },
        Arc::new(InMemoryUserStore::new()),
        Arc::new(StalledRepository),
        Arc::new(SystemClock),
    );

    let started = std::time::Instant::now();
    let err = gate.refresh(Some("Bearer whatever")).await.unwrap_err();

    assert!(matches!(err, AuthError::Internal(_)));
    assert!(started.elapsed() < StdDuration::from_secs(5));
}
