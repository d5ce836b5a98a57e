//! OAuth 인증 결과 모델
//!
//! 애플리케이션 환경이 OAuth 콜백 검증 후 돌려주는 결과입니다.
//! 멤버십 서비스는 이 결과를 해석할 뿐, 전송 계층을 직접 구현하지 않습니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 외부 프로바이더 인증 시도의 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationResult {
    /// 인증 성공 여부
    pub succeeded: bool,
    /// 프로바이더 이름
    pub provider: String,
    /// 프로바이더가 부여한 사용자 ID (성공 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_user_id: Option<String>,
    /// 프로바이더가 보고한 사용자명 (성공 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 프로바이더가 돌려준 추가 데이터
    #[serde(default)]
    pub extra_data: HashMap<String, String>,
    /// 실패 사유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthenticationResult {
    /// 성공 결과 생성
    pub fn success(
        provider: impl Into<String>,
        provider_user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            succeeded: true,
            provider: provider.into(),
            provider_user_id: Some(provider_user_id.into()),
            username: Some(username.into()),
            extra_data: HashMap::new(),
            error: None,
        }
    }

    /// 실패 결과 생성
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            provider: String::new(),
            provider_user_id: None,
            username: None,
            extra_data: HashMap::new(),
            error: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result = AuthenticationResult::success("google", "g-123", "alice");

        assert!(result.succeeded);
        assert_eq!(result.provider, "google");
        assert_eq!(result.provider_user_id.as_deref(), Some("g-123"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_result() {
        let result = AuthenticationResult::failed("no provider name returned");

        assert!(!result.succeeded);
        assert!(result.provider_user_id.is_none());
        assert_eq!(result.error.as_deref(), Some("no provider name returned"));
    }
}
