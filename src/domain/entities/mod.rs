//! 핵심 도메인 엔티티 모듈
//!
//! 저장소 어댑터가 영속화하는 멤버십 도메인 객체들을 제공합니다.

pub mod users;
pub mod roles;
