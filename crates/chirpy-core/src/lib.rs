//! # Chirpy Core
//!
//! Chirpy API의 자격증명 및 세션 토큰 서브시스템을 제공합니다.
//!
//! - 비밀번호 해싱 및 검증
//! - Access Token (JWT) 발급/검증
//! - Refresh Token 발급/교환/폐기
//! - 요청 인가 게이트
//! - 설정 관리와 로깅 인프라
//! - 저장소 trait 및 인메모리 구현

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod store;

pub use auth::{AuthorizationGate, LoginOutcome};
pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
