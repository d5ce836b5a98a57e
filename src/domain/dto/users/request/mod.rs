//! 사용자 관련 요청 DTO 모듈

pub mod registration_request;

pub use registration_request::*;
