//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → `CHIRPY__SECTION__KEY` 환경 변수 → 기존 평문 환경 변수
//! (`DB_URL`, `PLATFORM`, `TOKEN_SECRET`) 순서로 덮어씁니다.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::AuthError;

/// Refresh Token 수명은 Access Token 수명의 최소 이 배수 이상이어야 합니다.
pub const MIN_REFRESH_TO_ACCESS_RATIO: i64 = 10;

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 실행 플랫폼 ("dev"일 때만 관리자 리셋 허용)
    pub platform: String,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 전체 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 문자열 (없으면 인메모리 저장소 사용)
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 5,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 비밀번호 해싱 작업 계수 (Argon2id).
///
/// 검증은 해시 문자열에 기록된 파라미터를 사용하므로,
/// 값을 바꿔도 기존 해시는 계속 검증됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PasswordPolicy {
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬도
    pub parallelism: u32,
}

impl PasswordPolicy {
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(
            argon2::Params::DEFAULT_M_COST,
            argon2::Params::DEFAULT_T_COST,
            argon2::Params::DEFAULT_P_COST,
        )
    }
}

/// 인증 설정.
///
/// 서명 키는 `SecretString`으로 보관되며 `Debug` 출력에 노출되지 않습니다.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Access Token HMAC 서명 키
    #[serde(deserialize_with = "deserialize_secret")]
    pub token_secret: SecretString,
    /// Access Token 수명 (초)
    pub access_token_ttl_secs: i64,
    /// Refresh Token 수명 (일)
    pub refresh_token_ttl_days: i64,
    /// 저장소 호출 타임아웃 (밀리초)
    pub store_timeout_ms: u64,
    /// 비밀번호 해싱 정책
    #[serde(default)]
    pub password: PasswordPolicy,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl AuthConfig {
    /// 주어진 서명 키와 기본값으로 설정을 생성합니다.
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: SecretString::from(token_secret.into()),
            access_token_ttl_secs: 3600,
            refresh_token_ttl_days: 60,
            store_timeout_ms: 5_000,
            password: PasswordPolicy::default(),
        }
    }

    /// 비밀번호 정책을 설정합니다.
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password = policy;
        self
    }

    /// Access Token 수명을 설정합니다.
    pub fn with_access_token_ttl_secs(mut self, secs: i64) -> Self {
        self.access_token_ttl_secs = secs;
        self
    }

    /// Refresh Token 수명을 설정합니다.
    pub fn with_refresh_token_ttl_days(mut self, days: i64) -> Self {
        self.refresh_token_ttl_days = days;
        self
    }

    /// 범위를 벗어난 값은 `TimeDelta::MAX`로 포화됩니다. `validate()`가 먼저 거부합니다.
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::TimeDelta::try_seconds(self.access_token_ttl_secs).unwrap_or(chrono::TimeDelta::MAX)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::TimeDelta::try_days(self.refresh_token_ttl_days).unwrap_or(chrono::TimeDelta::MAX)
    }

    pub fn store_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.store_timeout_ms)
    }

    /// 시작 시점 설정 검증.
    ///
    /// # Errors
    ///
    /// 서명 키가 비어 있을 때, 수명 값이 범위를 벗어났을 때,
    /// Refresh Token 수명이 Access Token 수명의 10배 미만일 때
    /// `AuthError::InvalidConfiguration`을 반환합니다.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.token_secret.expose_secret().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "auth.token_secret이 비어 있습니다".to_string(),
            ));
        }

        if self.access_token_ttl_secs <= 0
            || chrono::TimeDelta::try_seconds(self.access_token_ttl_secs).is_none()
        {
            return Err(AuthError::InvalidConfiguration(
                "auth.access_token_ttl_secs가 허용 범위를 벗어났습니다".to_string(),
            ));
        }

        let refresh_secs = chrono::TimeDelta::try_days(self.refresh_token_ttl_days)
            .map(|ttl| ttl.num_seconds())
            .ok_or_else(|| {
                AuthError::InvalidConfiguration(format!(
                    "auth.refresh_token_ttl_days({})가 허용 범위를 벗어났습니다",
                    self.refresh_token_ttl_days
                ))
            })?;
        if refresh_secs < self.access_token_ttl_secs.saturating_mul(MIN_REFRESH_TO_ACCESS_RATIO) {
            return Err(AuthError::InvalidConfiguration(format!(
                "Refresh Token 수명({}초)은 Access Token 수명({}초)의 {}배 이상이어야 합니다",
                refresh_secs, self.access_token_ttl_secs, MIN_REFRESH_TO_ACCESS_RATIO
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 설정 파일은 없어도 됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.connection_timeout_secs", 5)?
            .set_default("auth.token_secret", "")?
            .set_default("auth.access_token_ttl_secs", 3600)?
            .set_default("auth.refresh_token_ttl_days", 60)?
            .set_default("auth.store_timeout_ms", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("platform", "prod")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CHIRPY")
                    .separator("__")
                    .try_parsing(true),
            )
            // 기존 배포 환경의 평문 환경 변수
            .set_override_option("database.url", std::env::var("DB_URL").ok())?
            .set_override_option("platform", std::env::var("PLATFORM").ok())?
            .set_override_option("auth.token_secret", std::env::var("TOKEN_SECRET").ok())?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 개발 플랫폼 여부.
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}
