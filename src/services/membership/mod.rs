//! 멤버십 서비스 모듈
//!
//! 로컬 계정, OAuth 연결, 역할과는 독립적인 인증 흐름의 오케스트레이션을
//! 담당합니다.

pub mod membership_service;
pub mod provider_registry;

pub use membership_service::*;
pub use provider_registry::*;
