//! 인증 크레덴셜 서비스 모듈

pub mod security_encoder;

pub use security_encoder::*;
