//! 계정 등록 요청 DTO
//!
//! 새로운 로컬 계정 생성을 위한 요청 데이터 구조를 정의합니다.
//! 입력 데이터의 검증과 타입 안전성을 보장합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 새로운 로컬 계정 생성을 위한 요청 DTO
///
/// 역직렬화와 입력 검증을 자동으로 수행합니다.
/// 비밀번호는 평문으로 전달되며 서비스 계층에서 해시됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    /// 사용자명 (필수, 공백 불가)
    #[validate(length(min = 1, message = "사용자명은 필수입니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub username: String,

    /// 계정 비밀번호 (필수)
    #[validate(length(min = 1, message = "비밀번호는 필수입니다"))]
    pub password: String,

    /// 비밀번호 솔트 (지정하지 않으면 서비스가 자동 생성)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl RegistrationRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            salt: None,
        }
    }
}

/// 공백만으로 구성된 사용자명 거부
fn validate_not_blank(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::new("blank_username")
            .with_message("사용자명은 공백일 수 없습니다".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_passes() {
        let request = RegistrationRequest::new("alice", "pw1");

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_username_fails() {
        let request = RegistrationRequest::new("", "pw1");

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_blank_username_fails() {
        let request = RegistrationRequest::new("   ", "pw1");

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_password_fails() {
        let request = RegistrationRequest::new("alice", "");

        assert!(request.validate().is_err());
    }
}
