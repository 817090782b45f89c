//! 인증 서브시스템의 도메인 모델과 외부 협력자 trait.

mod chirp;
mod clock;
mod refresh_token;
mod user;

pub use chirp::*;
pub use clock::*;
pub use refresh_token::*;
pub use user::*;
