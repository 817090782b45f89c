//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 해싱 및 검증. 솔트는 호출마다 OS 난수로 생성되어
//! PHC 문자열에 함께 저장됩니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::PasswordPolicy;

/// 비밀번호 처리 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    /// 빈 해시, 잘못된 형식, 불일치를 구분하지 않습니다.
    #[error("자격증명 불일치")]
    CredentialMismatch,
}

/// 비밀번호 해싱.
///
/// # Arguments
///
/// * `password` - 해싱할 평문 비밀번호
/// * `policy` - Argon2id 작업 계수
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트와 파라미터 포함)
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password", &PasswordPolicy::default()).unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str, policy: &PasswordPolicy) -> Result<String, PasswordError> {
    let params = Params::new(policy.memory_kib, policy.iterations, policy.parallelism, None)
        .map_err(|_| PasswordError::HashingFailed)?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 해시에 기록된 솔트와 파라미터로 재계산한 뒤 상수 시간 비교합니다.
/// 빈 해시, 파싱 불가능한 해시, 불일치 모두 `CredentialMismatch` 하나로 보고합니다.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::CredentialMismatch)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::CredentialMismatch)
}
