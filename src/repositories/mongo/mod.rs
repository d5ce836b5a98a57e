//! MongoDB 저장소 어댑터 모듈

pub mod membership_store;

pub use membership_store::*;
