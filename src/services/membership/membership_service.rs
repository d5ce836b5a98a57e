//! 멤버십 서비스
//!
//! 로컬 계정 인증, OAuth 계정 연결, 비밀번호 재설정 흐름을 오케스트레이션하는
//! 핵심 서비스입니다. 저장소 계약, 비밀번호 인코더, 애플리케이션 환경,
//! 프로바이더 레지스트리를 생성자 주입으로 받으며 전역 상태를 사용하지
//! 않습니다.
//!
//! ## 보안 의미론
//!
//! - `login`은 알 수 없는 사용자와 잘못된 비밀번호를 구분하지 않고 둘 다
//!   `Ok(false)`를 반환합니다. 사용자 존재 여부가 응답으로 새지 않습니다.
//! - `has_local_account`와 `change_password`는 조회/관리 연산이므로 없는
//!   사용자를 `NotFound`로 구분해 알립니다.
//! - OAuth 연결 해제는 저장소의 락아웃 가드를 그대로 따릅니다. 마지막 남은
//!   인증 수단은 제거되지 않습니다.

use std::sync::Arc;

use log::info;
use mongodb::bson::DateTime;
use uuid::Uuid;
use validator::Validate;

use crate::domain::dto::users::request::registration_request::RegistrationRequest;
use crate::domain::entities::users::user::{OAuthAccount, User};
use crate::domain::models::auth::AuthenticationResult;
use crate::environment::ApplicationEnvironment;
use crate::errors::{AppError, AppResult};
use crate::repositories::contracts::UserStore;
use crate::services::auth::security_encoder::SecurityEncoder;
use crate::services::membership::provider_registry::{
    AuthenticationClientData, ProviderRegistry,
};
use crate::utils::string_utils::clean_optional_string;

/// 멤버십 오케스트레이션 서비스
pub struct MembershipService {
    /// 사용자 레코드 저장소
    user_store: Arc<dyn UserStore>,
    /// 비밀번호 인코더
    encoder: Arc<dyn SecurityEncoder>,
    /// 세션 발급과 OAuth 왕복을 담당하는 외부 협력자
    environment: Arc<dyn ApplicationEnvironment>,
    /// 등록된 OAuth 프로바이더 레지스트리
    providers: Arc<ProviderRegistry>,
}

impl MembershipService {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        encoder: Arc<dyn SecurityEncoder>,
        environment: Arc<dyn ApplicationEnvironment>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            user_store,
            encoder,
            environment,
            providers,
        }
    }

    /// 로컬 계정 로그인
    ///
    /// 비밀번호가 일치하면 세션을 발급하고 true를 반환합니다.
    /// 알 수 없는 사용자, 로컬 비밀번호가 없는 사용자, 잘못된 비밀번호는
    /// 모두 구분 없이 false입니다.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        persistent: bool,
    ) -> AppResult<bool> {
        let Some(user) = self.user_store.get_user_by_username(username).await? else {
            return Ok(false);
        };

        if !user.has_local_password() {
            return Ok(false);
        }

        let stored_hash = user.password_hash.as_deref().unwrap_or_default();
        let matched = self.encoder.is_match(password, stored_hash)?;

        if matched {
            self.environment.issue_session(&user.username, persistent);
            info!("✅ 로그인 성공: {}", user.username);
        }
        Ok(matched)
    }

    /// 현재 세션 종료
    pub fn logout(&self) {
        self.environment.revoke_session();
        info!("로그아웃 처리 완료");
    }

    /// 새 로컬 계정 생성
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 사용자명 또는 비밀번호가 비어 있음
    /// * `ConflictError` - 같은 사용자명의 계정이 이미 존재
    pub async fn create_account(&self, request: RegistrationRequest) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let salt = clean_optional_string(request.salt)
            .unwrap_or_else(|| self.encoder.generate_salt());
        let password_hash = self.encoder.encode(&request.password, &salt)?;

        let user = self
            .user_store
            .add(User::new_local(request.username, password_hash, salt))
            .await?;

        info!("✅ 계정 생성 완료: {}", user.username);
        Ok(user)
    }

    /// 사용자가 로컬 비밀번호로 가입한 계정인지 확인
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 사용자명의 사용자가 존재하지 않음
    pub async fn has_local_account(&self, username: &str) -> AppResult<bool> {
        let user = self.require_user(username).await?;
        Ok(user.is_local)
    }

    /// 비밀번호 변경
    ///
    /// 기존 비밀번호 검증에 실패하면 변경 없이 false를 반환합니다.
    /// 성공 시 저장된 솔트를 유지한 채 새 비밀번호를 해시하고 true를
    /// 반환합니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 사용자명의 사용자가 존재하지 않음
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<bool> {
        let mut user = self.require_user(username).await?;

        let Some(stored_hash) = user.password_hash.clone() else {
            return Ok(false);
        };
        if !self.encoder.is_match(old_password, &stored_hash)? {
            return Ok(false);
        }

        let salt = match user.password_salt.clone() {
            Some(salt) if !salt.is_empty() => salt,
            _ => self.encoder.generate_salt(),
        };
        user.password_hash = Some(self.encoder.encode(new_password, &salt)?);
        user.password_salt = Some(salt);

        self.user_store.save(user).await?;
        info!("✅ 비밀번호 변경 완료: {}", username);
        Ok(true)
    }

    /// OAuth 계정 생성 또는 기존 사용자에 연결
    ///
    /// 사용자명에 해당하는 사용자가 없으면 로컬 비밀번호 없는 사용자를
    /// 만들어 연결합니다.
    pub async fn create_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        username: &str,
    ) -> AppResult<User> {
        let user = self
            .user_store
            .create_oauth_account(provider, provider_user_id, username)
            .await?;
        info!("✅ OAuth 계정 연결 완료: {} ({})", username, provider);
        Ok(user)
    }

    /// 외부 identity에 연결된 로컬 사용자명 조회
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 identity에 연결된 사용자가 없음
    pub async fn get_username_from_oauth(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<String> {
        self.user_store
            .get_user_by_oauth_provider(provider, provider_user_id)
            .await?
            .map(|user| user.username)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No user linked to OAuth identity '{}/{}'",
                    provider, provider_user_id
                ))
            })
    }

    /// OAuth 계정 연결 해제
    ///
    /// 락아웃 가드에 걸리거나 일치하는 연결이 없으면 false를 반환합니다.
    pub async fn disassociate_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<bool> {
        self.user_store
            .delete_oauth_account(provider, provider_user_id)
            .await
    }

    /// 사용자의 연결된 OAuth 계정 목록
    pub async fn get_oauth_accounts(&self, username: &str) -> AppResult<Vec<OAuthAccount>> {
        self.user_store.get_oauth_accounts_for_user(username).await
    }

    /// 등록된 프로바이더의 클라이언트 데이터 조회
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 이름의 프로바이더가 등록되어 있지 않음
    pub fn get_oauth_client_data(&self, provider: &str) -> AppResult<AuthenticationClientData> {
        self.providers
            .get(provider)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("Provider '{}' is not registered", provider))
            })
    }

    /// 등록된 모든 프로바이더의 클라이언트 데이터
    pub fn registered_client_data(&self) -> Vec<AuthenticationClientData> {
        self.providers
            .registered_clients()
            .into_iter()
            .cloned()
            .collect()
    }

    /// 프로바이더로의 인증 리디렉션 시작
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 이름의 프로바이더가 등록되어 있지 않음
    pub fn request_oauth_authentication(
        &self,
        provider: &str,
        return_url: &str,
    ) -> AppResult<()> {
        let client = self.providers.get(provider).ok_or_else(|| {
            AppError::NotFound(format!("Provider '{}' is not registered", provider))
        })?;
        self.environment.request_authentication(client, return_url)
    }

    /// 프로바이더 콜백 검증
    ///
    /// 콜백에 프로바이더 이름이 없거나 등록되지 않은 이름이면 오류 대신
    /// 실패 결과를 반환합니다.
    pub fn verify_oauth_authentication(
        &self,
        return_url: &str,
    ) -> AppResult<AuthenticationResult> {
        let Some(provider_name) = self.environment.returned_provider_name() else {
            return Ok(AuthenticationResult::failed(
                "콜백에 프로바이더 이름이 없습니다",
            ));
        };

        let Some(client) = self.providers.get(&provider_name) else {
            return Ok(AuthenticationResult::failed(format!(
                "등록되지 않은 프로바이더: {}",
                provider_name
            )));
        };

        self.environment.verify_authentication(client, return_url)
    }

    /// 외부 identity로 로그인
    ///
    /// 연결된 로컬 사용자가 있으면 세션을 발급하고 true를 반환합니다.
    pub async fn oauth_login(
        &self,
        provider: &str,
        provider_user_id: &str,
        persistent: bool,
    ) -> AppResult<bool> {
        match self
            .user_store
            .get_user_by_oauth_provider(provider, provider_user_id)
            .await?
        {
            Some(user) => {
                self.environment.issue_session(&user.username, persistent);
                info!("✅ OAuth 로그인 성공: {} ({})", user.username, provider);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 비밀번호 재설정 토큰 발급
    ///
    /// 발급된 토큰은 `valid_minutes` 분 후 만료됩니다.
    /// 재발급하면 기존 토큰은 덮어써집니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 사용자명의 사용자가 존재하지 않음
    pub async fn generate_password_reset_token(
        &self,
        username: &str,
        valid_minutes: i64,
    ) -> AppResult<String> {
        let mut user = self.require_user(username).await?;

        let token = Uuid::new_v4().simple().to_string();
        let expiration =
            DateTime::from_millis(DateTime::now().timestamp_millis() + valid_minutes * 60_000);

        user.password_reset_token = Some(token.clone());
        user.password_reset_token_expiration = Some(expiration);
        self.user_store.save(user).await?;

        info!("비밀번호 재설정 토큰 발급: {}", username);
        Ok(token)
    }

    /// 재설정 토큰으로 비밀번호 변경
    ///
    /// 알 수 없는 토큰이거나 만료된 토큰이면 변경 없이 false를 반환합니다.
    /// 성공 시 토큰을 소거하므로 같은 토큰을 재사용할 수 없습니다.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<bool> {
        let Some(mut user) = self
            .user_store
            .get_user_by_password_reset_token(token)
            .await?
        else {
            return Ok(false);
        };

        let now = DateTime::now().timestamp_millis();
        let expired = match user.password_reset_token_expiration {
            Some(expiration) => expiration.timestamp_millis() < now,
            None => true,
        };
        if expired {
            return Ok(false);
        }

        let salt = match user.password_salt.clone() {
            Some(salt) if !salt.is_empty() => salt,
            _ => self.encoder.generate_salt(),
        };
        user.password_hash = Some(self.encoder.encode(new_password, &salt)?);
        user.password_salt = Some(salt);
        user.password_reset_token = None;
        user.password_reset_token_expiration = None;

        self.user_store.save(user).await?;
        info!("✅ 비밀번호 재설정 완료: {}", redact_token(token));
        Ok(true)
    }

    async fn require_user(&self, username: &str) -> AppResult<User> {
        self.user_store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No user by username '{}' found", username))
            })
    }
}

/// 로그에 토큰 원문을 남기지 않기 위한 축약 표기
fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("token {}…", prefix)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::repositories::memory::InMemoryMembershipStore;
    use crate::services::auth::security_encoder::DefaultSecurityEncoder;

    /// 세션 발급과 콜백 상호작용을 기록만 하는 가짜 환경
    #[derive(Default)]
    struct FakeEnvironment {
        sessions: Mutex<Vec<(String, bool)>>,
        revoked: Mutex<u32>,
        requested: Mutex<Vec<String>>,
        callback_provider: Option<String>,
    }

    impl FakeEnvironment {
        fn with_callback(provider: &str) -> Self {
            Self {
                callback_provider: Some(provider.to_string()),
                ..Self::default()
            }
        }

        fn sessions(&self) -> Vec<(String, bool)> {
            self.sessions.lock().unwrap().clone()
        }

        fn revoked_count(&self) -> u32 {
            *self.revoked.lock().unwrap()
        }

        fn requested_providers(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl ApplicationEnvironment for FakeEnvironment {
        fn issue_session(&self, username: &str, persistent: bool) {
            self.sessions
                .lock()
                .unwrap()
                .push((username.to_string(), persistent));
        }

        fn revoke_session(&self) {
            *self.revoked.lock().unwrap() += 1;
        }

        fn request_authentication(
            &self,
            client: &AuthenticationClientData,
            _return_url: &str,
        ) -> AppResult<()> {
            self.requested
                .lock()
                .unwrap()
                .push(client.provider_name.clone());
            Ok(())
        }

        fn verify_authentication(
            &self,
            client: &AuthenticationClientData,
            _return_url: &str,
        ) -> AppResult<AuthenticationResult> {
            Ok(AuthenticationResult::success(
                client.provider_name.as_str(),
                "ext-1",
                "callback-user",
            ))
        }

        fn returned_provider_name(&self) -> Option<String> {
            self.callback_provider.clone()
        }
    }

    fn registry_with_google() -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry
            .register(AuthenticationClientData::new("google", "Google"))
            .unwrap();
        registry
    }

    fn service_with(
        environment: Arc<FakeEnvironment>,
        providers: ProviderRegistry,
    ) -> MembershipService {
        let _ = env_logger::builder().is_test(true).try_init();

        MembershipService::new(
            Arc::new(InMemoryMembershipStore::new()),
            Arc::new(DefaultSecurityEncoder::with_cost(4)),
            environment,
            Arc::new(providers),
        )
    }

    fn service() -> (MembershipService, Arc<FakeEnvironment>) {
        let environment = Arc::new(FakeEnvironment::default());
        (
            service_with(environment.clone(), registry_with_google()),
            environment,
        )
    }

    #[tokio::test]
    async fn test_create_account_then_login() {
        let (service, environment) = service();
        service
            .create_account(RegistrationRequest::new("alice", "pw1"))
            .await
            .unwrap();

        assert!(service.login("alice", "pw1", true).await.unwrap());
        assert!(!service.login("alice", "wrong", false).await.unwrap());

        assert_eq!(environment.sessions(), vec![("alice".to_string(), true)]);
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_plain_false() {
        let (service, environment) = service();

        // 알 수 없는 사용자와 잘못된 비밀번호는 구분되지 않는다
        assert!(!service.login("ghost", "pw", false).await.unwrap());
        assert!(environment.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_account_is_rejected() {
        let (service, _environment) = service();
        service
            .create_account(RegistrationRequest::new("alice", "pw1"))
            .await
            .unwrap();

        let result = service
            .create_account(RegistrationRequest::new("alice", "pw2"))
            .await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_create_account_validates_input() {
        let (service, _environment) = service();

        let result = service
            .create_account(RegistrationRequest::new("  ", "pw"))
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let (service, environment) = service();

        service.logout();

        assert_eq!(environment.revoked_count(), 1);
    }

    #[tokio::test]
    async fn test_has_local_account_distinguishes_missing_user() {
        let (service, _environment) = service();
        service
            .create_account(RegistrationRequest::new("alice", "pw1"))
            .await
            .unwrap();
        service
            .create_oauth_account("google", "g-1", "bob")
            .await
            .unwrap();

        assert!(service.has_local_account("alice").await.unwrap());
        assert!(!service.has_local_account("bob").await.unwrap());
        assert!(service
            .has_local_account("ghost")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let (service, _environment) = service();
        service
            .create_account(RegistrationRequest::new("alice", "pw1"))
            .await
            .unwrap();

        assert!(!service.change_password("alice", "wrong", "pw2").await.unwrap());
        assert!(service.change_password("alice", "pw1", "pw2").await.unwrap());

        assert!(!service.login("alice", "pw1", false).await.unwrap());
        assert!(service.login("alice", "pw2", false).await.unwrap());
    }

    #[tokio::test]
    async fn test_change_password_missing_user_is_not_found() {
        let (service, _environment) = service();

        let result = service.change_password("ghost", "a", "b").await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_oauth_account_round_trip() {
        let (service, _environment) = service();
        service
            .create_oauth_account("google", "g-1", "bob")
            .await
            .unwrap();

        assert_eq!(
            service.get_username_from_oauth("google", "g-1").await.unwrap(),
            "bob"
        );
        let accounts = service.get_oauth_accounts("bob").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].matches("google", "g-1"));
    }

    #[tokio::test]
    async fn test_unlinked_identity_is_not_found() {
        let (service, _environment) = service();

        let result = service.get_username_from_oauth("google", "nope").await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_oauth_login_issues_session() {
        let (service, environment) = service();
        service
            .create_oauth_account("google", "g-1", "bob")
            .await
            .unwrap();

        assert!(service.oauth_login("google", "g-1", false).await.unwrap());
        assert!(!service.oauth_login("google", "other", false).await.unwrap());

        assert_eq!(environment.sessions(), vec![("bob".to_string(), false)]);
    }

    #[tokio::test]
    async fn test_disassociate_respects_lockout_guard() {
        let (service, _environment) = service();
        service
            .create_oauth_account("google", "g-1", "bob")
            .await
            .unwrap();

        // 유일한 인증 수단은 제거되지 않는다
        assert!(!service
            .disassociate_oauth_account("google", "g-1")
            .await
            .unwrap());

        service
            .create_oauth_account("github", "gh-1", "bob")
            .await
            .unwrap();
        assert!(service
            .disassociate_oauth_account("google", "g-1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_request_authentication_requires_registered_provider() {
        let (service, environment) = service();

        service
            .request_oauth_authentication("google", "/return")
            .unwrap();
        let unknown = service.request_oauth_authentication("github", "/return");

        assert!(unknown.unwrap_err().is_not_found());
        assert_eq!(environment.requested_providers(), vec!["google".to_string()]);
    }

    #[tokio::test]
    async fn test_verify_without_callback_provider_fails_softly() {
        let (service, _environment) = service();

        let result = service.verify_oauth_authentication("/return").unwrap();

        assert!(!result.succeeded);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_verify_unregistered_provider_fails_softly() {
        let environment = Arc::new(FakeEnvironment::with_callback("github"));
        let service = service_with(environment, registry_with_google());

        let result = service.verify_oauth_authentication("/return").unwrap();

        assert!(!result.succeeded);
    }

    #[tokio::test]
    async fn test_verify_registered_provider_succeeds() {
        let environment = Arc::new(FakeEnvironment::with_callback("google"));
        let service = service_with(environment, registry_with_google());

        let result = service.verify_oauth_authentication("/return").unwrap();

        assert!(result.succeeded);
        assert_eq!(result.provider, "google");
        assert_eq!(result.username.as_deref(), Some("callback-user"));
    }

    #[tokio::test]
    async fn test_get_oauth_client_data() {
        let (service, _environment) = service();

        assert_eq!(
            service.get_oauth_client_data("GOOGLE").unwrap().provider_name,
            "google"
        );
        assert!(service
            .get_oauth_client_data("github")
            .unwrap_err()
            .is_not_found());
        assert_eq!(service.registered_client_data().len(), 1);
    }

    #[tokio::test]
    async fn test_password_reset_round_trip() {
        let (service, _environment) = service();
        service
            .create_account(RegistrationRequest::new("alice", "pw1"))
            .await
            .unwrap();

        let token = service
            .generate_password_reset_token("alice", 30)
            .await
            .unwrap();

        assert!(service.reset_password(&token, "pw2").await.unwrap());
        assert!(service.login("alice", "pw2", false).await.unwrap());
        assert!(!service.login("alice", "pw1", false).await.unwrap());

        // 토큰은 일회용이다
        assert!(!service.reset_password(&token, "pw3").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_reset_token_is_rejected() {
        let (service, _environment) = service();
        service
            .create_account(RegistrationRequest::new("alice", "pw1"))
            .await
            .unwrap();

        let token = service
            .generate_password_reset_token("alice", -1)
            .await
            .unwrap();

        assert!(!service.reset_password(&token, "pw2").await.unwrap());
        assert!(service.login("alice", "pw1", false).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_token_for_missing_user_is_not_found() {
        let (service, _environment) = service();

        let result = service.generate_password_reset_token("ghost", 30).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_reset_token_is_false() {
        let (service, _environment) = service();

        assert!(!service.reset_password("no-such-token", "pw").await.unwrap());
    }
}
