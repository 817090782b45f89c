//! 저장소 구현체.
//!
//! PostgreSQL 구현은 `chirpy-api`의 `repository` 모듈에 있습니다.

pub mod memory;

pub use memory::{InMemoryChirpStore, InMemoryRefreshTokenRepository, InMemoryUserStore};
