//! 역할 엔티티 모듈
//!
//! [`role::Role`]을 제공합니다.

pub mod role;
