//! Services Module
//!
//! 비즈니스 로직 계층의 서비스들을 정의하는 모듈입니다.
//! 저장소 계약과 애플리케이션 환경 사이에서 멤버십 의미론을 구현합니다.

pub mod auth;
pub mod membership;
