//! 인증 결과 모델 모듈

pub mod authentication_result;

pub use authentication_result::*;
