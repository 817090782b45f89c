//! 요청 인가 게이트.
//!
//! 비밀번호, Access Token, Refresh Token 구성요소를 묶어 핸들러가 호출하는
//! 고수준 작업(로그인, 인가, 갱신, 폐기, 소유자 확인)을 제공합니다.
//!
//! 인증 실패의 실제 원인은 `debug` 레벨로만 기록되고 호출자에게는
//! 항상 `AuthError::Unauthorized` 하나로 보고됩니다.
//! 존재하지 않는 이메일로 로그인해도 더미 해시에 대한 검증을 수행하므로
//! 응답 시간으로 가입 여부를 구분할 수 없습니다.

use std::sync::Arc;

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::bearer::extract_bearer_token;
use super::jwt::{issue_access_token_at, validate_access_token_at, AccessTokenError};
use super::password::{hash_password, verify_password, PasswordError};
use super::refresh::{RefreshTokenError, RefreshTokenStore};
use crate::config::{AuthConfig, PasswordPolicy};
use crate::domain::{Clock, RefreshTokenRepository, UserCredentialStore, UserRecord};
use crate::error::{with_store_timeout, AuthError, AuthResult};

/// 로그인 결과.
#[derive(Clone)]
pub struct LoginOutcome {
    pub user: UserRecord,
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for LoginOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginOutcome")
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// 더미 해시 생성에 쓰는 평문. 어떤 사용자 입력과도 비교되지 않습니다.
const DUMMY_PASSWORD: &str = "chirpy-dummy-password";

/// 인가 게이트.
pub struct AuthorizationGate {
    users: Arc<dyn UserCredentialStore>,
    refresh_tokens: RefreshTokenStore,
    clock: Arc<dyn Clock>,
    token_secret: SecretString,
    access_ttl: Duration,
    password_policy: PasswordPolicy,
    store_timeout: std::time::Duration,
    /// 현재 정책으로 만든 해시. 첫 미가입 로그인 때 한 번 계산됩니다.
    dummy_hash: OnceCell<String>,
}

impl AuthorizationGate {
    /// 설정과 저장소로 게이트를 생성합니다.
    ///
    /// 설정 검증(`AuthConfig::validate`)은 호출자 책임입니다.
    pub fn new(
        config: &AuthConfig,
        users: Arc<dyn UserCredentialStore>,
        refresh_repo: Arc<dyn RefreshTokenRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let refresh_tokens = RefreshTokenStore::new(
            refresh_repo,
            clock.clone(),
            config.refresh_token_ttl(),
            config.store_timeout(),
        );

        Self {
            users,
            refresh_tokens,
            clock,
            token_secret: SecretString::from(config.token_secret.expose_secret().to_owned()),
            access_ttl: config.access_token_ttl(),
            password_policy: config.password,
            store_timeout: config.store_timeout(),
            dummy_hash: OnceCell::new(),
        }
    }

    /// 새 사용자 등록.
    ///
    /// # Errors
    ///
    /// - `Malformed`: 이메일 또는 비밀번호가 비어 있음
    /// - `Conflict`: 이미 등록된 이메일
    pub async fn register(&self, email: &str, password: &str) -> AuthResult<UserRecord> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Malformed(
                "이메일과 비밀번호가 필요합니다".to_string(),
            ));
        }

        let hashed = self.hash(password).await?;
        let user = with_store_timeout(self.store_timeout, self.users.create(email, &hashed)).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// 이메일/비밀번호 로그인.
    ///
    /// 존재하지 않는 이메일과 잘못된 비밀번호는 같은 `Unauthorized`로 보고합니다.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let user = match with_store_timeout(self.store_timeout, self.users.find_by_email(email))
            .await?
        {
            Some(user) => user,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| self.hash(DUMMY_PASSWORD))
                    .await?;
                // 결과와 무관하게 실패
                let _ = self.verify(password, dummy).await?;
                debug!("Login rejected: unknown email");
                return Err(AuthError::Unauthorized);
            }
        };

        if let Err(e) = self.verify(password, &user.hashed_password).await? {
            debug!(user_id = %user.id, reason = %e, "Login rejected");
            return Err(AuthError::Unauthorized);
        }

        let access_token = self.issue_access_token(user.id)?;
        let refresh = self.refresh_tokens.issue(user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token: refresh.token,
        })
    }

    /// 인증된 사용자의 이메일과 비밀번호를 교체합니다.
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> AuthResult<UserRecord> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Malformed(
                "이메일과 비밀번호가 필요합니다".to_string(),
            ));
        }

        let hashed = self.hash(password).await?;
        let user = with_store_timeout(
            self.store_timeout,
            self.users.update_credential(user_id, email, &hashed),
        )
        .await?;

        info!(user_id = %user.id, "User credentials updated");
        Ok(user)
    }

    /// 결제 이벤트에 따라 사용자에게 Chirpy Red 멤버십을 부여합니다.
    ///
    /// # Errors
    ///
    /// - `NotFound`: 존재하지 않는 사용자
    pub async fn upgrade_user(&self, user_id: Uuid) -> AuthResult<UserRecord> {
        let user = with_store_timeout(self.store_timeout, self.users.find_by_id(user_id))
            .await?
            .ok_or(AuthError::NotFound)?;

        if user.is_chirpy_red {
            return Ok(user);
        }

        let user = with_store_timeout(self.store_timeout, self.users.upgrade(user_id)).await?;
        info!(user_id = %user.id, "User upgraded to Chirpy Red");
        Ok(user)
    }

    /// `Authorization` 헤더의 Access Token으로 요청 주체를 확인합니다.
    pub fn authorize(&self, header: Option<&str>) -> AuthResult<Uuid> {
        let token = extract_bearer_token(header).map_err(|e| {
            debug!(reason = %e, "Authorization rejected");
            AuthError::Unauthorized
        })?;

        validate_access_token_at(token, self.token_secret.expose_secret(), self.clock.now())
            .map_err(|e| {
                debug!(reason = %e, "Authorization rejected");
                AuthError::Unauthorized
            })
    }

    /// `Authorization` 헤더의 Refresh Token으로 새 Access Token을 발급합니다.
    ///
    /// 새 토큰의 수명은 로그인 시와 같습니다.
    pub async fn refresh(&self, header: Option<&str>) -> AuthResult<String> {
        let token = extract_bearer_token(header).map_err(|e| {
            debug!(reason = %e, "Refresh rejected");
            AuthError::Unauthorized
        })?;

        let user_id = self
            .refresh_tokens
            .redeem(token)
            .await
            .map_err(|e| {
                if e.is_retryable() {
                    return AuthError::from(e);
                }
                debug!(reason = %e, "Refresh rejected");
                AuthError::Unauthorized
            })?;

        self.issue_access_token(user_id)
    }

    /// `Authorization` 헤더의 Refresh Token을 폐기합니다.
    ///
    /// # Errors
    ///
    /// - `Unauthorized`: 헤더 누락 또는 형식 오류
    /// - `NotFound`: 발급된 적 없는 토큰
    pub async fn revoke_session(&self, header: Option<&str>) -> AuthResult<()> {
        let token = extract_bearer_token(header).map_err(|e| {
            debug!(reason = %e, "Revoke rejected");
            AuthError::Unauthorized
        })?;

        self.refresh_tokens.revoke(token).await.map_err(|e| match e {
            RefreshTokenError::NotFound => {
                debug!("Revoke of unknown refresh token");
                AuthError::NotFound
            }
            other => other.into(),
        })
    }

    /// 요청 주체가 리소스 소유자인지 확인합니다.
    pub fn ensure_owner(&self, principal: Uuid, owner: Uuid) -> AuthResult<()> {
        if principal != owner {
            debug!(principal = %principal, owner = %owner, "Ownership check failed");
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }

    /// 사용자와 Refresh Token을 모두 삭제합니다 (관리자 리셋).
    pub async fn reset(&self) -> AuthResult<u64> {
        let tokens = self.refresh_tokens.reset().await?;
        let users = with_store_timeout(self.store_timeout, self.users.reset()).await?;

        warn!(users, tokens, "All users and refresh tokens deleted");
        Ok(users)
    }

    fn issue_access_token(&self, user_id: Uuid) -> AuthResult<String> {
        issue_access_token_at(
            user_id,
            self.token_secret.expose_secret(),
            self.access_ttl,
            self.clock.now(),
        )
        .map_err(|e| match e {
            AccessTokenError::EmptySecret => {
                AuthError::InvalidConfiguration("서명 키가 비어 있습니다".to_string())
            }
            other => AuthError::Internal(other.to_string()),
        })
    }

    async fn hash(&self, password: &str) -> AuthResult<String> {
        let password = password.to_owned();
        let policy = self.password_policy;

        tokio::task::spawn_blocking(move || hash_password(&password, &policy))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// 바깥 `Result`는 작업 실행 실패, 안쪽은 검증 결과.
    async fn verify(
        &self,
        password: &str,
        hash: &str,
    ) -> AuthResult<Result<(), PasswordError>> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
