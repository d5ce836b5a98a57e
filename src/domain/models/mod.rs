//! 외부 협력자 통합 모델 모듈
//!
//! 애플리케이션 환경과 주고받는 인증 결과 모델을 제공합니다.

pub mod auth;

pub use auth::*;
