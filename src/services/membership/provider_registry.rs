//! OAuth 프로바이더 레지스트리
//!
//! 등록된 외부 인증 프로바이더의 메타데이터를 관리합니다.
//! 부트스트랩 시점에 구성되어 `Arc`로 멤버십 서비스에 주입되는 명시적
//! 객체이며, 프로세스 전역 가변 상태를 사용하지 않습니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::utils::string_utils::validate_required_string;

/// 등록된 프로바이더 클라이언트의 메타데이터
///
/// 실제 프로토콜 왕복은 애플리케이션 환경이 수행하므로, 여기에는 조회와
/// UI 표시에 필요한 데이터만 담깁니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationClientData {
    /// 프로바이더 이름 (조회 키, 대소문자 무시)
    pub provider_name: String,
    /// UI에 표시할 이름
    pub display_name: String,
    /// 프로바이더별 추가 데이터
    #[serde(default)]
    pub extra_data: HashMap<String, Value>,
}

impl AuthenticationClientData {
    pub fn new(provider_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            display_name: display_name.into(),
            extra_data: HashMap::new(),
        }
    }
}

/// 프로바이더 이름으로 클라이언트 데이터를 찾는 레지스트리
///
/// 조회는 대소문자를 무시합니다. 키는 소문자로 정규화해 저장합니다.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    clients: HashMap<String, AuthenticationClientData>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 프로바이더 클라이언트 등록
    ///
    /// # Errors
    ///
    /// * `ConflictError` - 같은 이름(대소문자 무시)의 프로바이더가 이미 등록됨
    /// * `ValidationError` - 프로바이더 이름이 비어 있음
    pub fn register(&mut self, client: AuthenticationClientData) -> AppResult<()> {
        validate_required_string(&client.provider_name, "provider name")?;

        let key = client.provider_name.to_lowercase();
        if self.clients.contains_key(&key) {
            return Err(AppError::ConflictError(format!(
                "Provider '{}' is already registered",
                client.provider_name
            )));
        }

        self.clients.insert(key, client);
        Ok(())
    }

    /// 이름으로 클라이언트 데이터 조회 (대소문자 무시)
    pub fn get(&self, provider_name: &str) -> Option<&AuthenticationClientData> {
        self.clients.get(&provider_name.to_lowercase())
    }

    /// 등록된 모든 클라이언트 데이터
    pub fn registered_clients(&self) -> Vec<&AuthenticationClientData> {
        let mut clients: Vec<&AuthenticationClientData> = self.clients.values().collect();
        clients.sort_by(|a, b| a.provider_name.cmp(&b.provider_name));
        clients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup_case_insensitive() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(AuthenticationClientData::new("Google", "Google 로그인"))
            .unwrap();

        assert!(registry.get("google").is_some());
        assert!(registry.get("GOOGLE").is_some());
        assert!(registry.get("github").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(AuthenticationClientData::new("google", "Google"))
            .unwrap();

        let result = registry.register(AuthenticationClientData::new("Google", "다른 표시명"));

        assert!(result.unwrap_err().is_conflict());
    }

    #[test]
    fn test_blank_provider_name_is_rejected() {
        let mut registry = ProviderRegistry::new();

        let result = registry.register(AuthenticationClientData::new("", "이름 없음"));

        assert!(result.is_err());
    }

    #[test]
    fn test_registered_clients_are_sorted() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(AuthenticationClientData::new("twitter", "Twitter"))
            .unwrap();
        registry
            .register(AuthenticationClientData::new("google", "Google"))
            .unwrap();

        let names: Vec<&str> = registry
            .registered_clients()
            .iter()
            .map(|c| c.provider_name.as_str())
            .collect();

        assert_eq!(names, vec!["google", "twitter"]);
    }
}
