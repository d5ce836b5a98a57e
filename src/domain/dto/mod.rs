//! 데이터 전송 객체 모듈
//!
//! 서비스 경계에서 입력 검증을 수행하는 요청 DTO들을 제공합니다.

pub mod users;

pub use users::*;
