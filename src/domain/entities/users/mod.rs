//! 사용자 엔티티 모듈
//!
//! [`user::User`]와 [`user::OAuthAccount`]를 제공합니다.

pub mod user;
