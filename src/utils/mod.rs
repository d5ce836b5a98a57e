//! 공통 유틸리티 함수 모듈
//!
//! 애플리케이션 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 검증, 정리 유틸리티
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::validate_required_string;
//!
//! let username = validate_required_string("  alice  ", "username")?;
//! ```

pub mod string_utils;
