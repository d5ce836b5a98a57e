//! 애플리케이션 환경 추상화 모듈
//!
//! 세션 발급과 OAuth 리디렉션 전송은 이 계층의 책임이 아닙니다.
//! 웹 프레임워크 쪽 협력자가 이 trait을 구현하여 티켓/세션 발급과
//! 프로바이더와의 왕복 통신을 수행하고, 멤버십 서비스는 그 결과만 해석합니다.

use crate::domain::models::auth::AuthenticationResult;
use crate::errors::AppResult;
use crate::services::membership::provider_registry::AuthenticationClientData;

/// 요청을 둘러싼 애플리케이션 환경에 대한 SPI
///
/// 구현체는 요청 컨텍스트(쿠키, 리디렉션 등)에 접근할 수 있는 외부
/// 협력자입니다. 테스트에서는 기록만 하는 가짜 구현을 사용합니다.
pub trait ApplicationEnvironment: Send + Sync {
    /// 인증된 세션 발급
    fn issue_session(&self, username: &str, persistent: bool);

    /// 현재 세션 무효화
    fn revoke_session(&self);

    /// 프로바이더로의 인증 리디렉션 시작
    fn request_authentication(
        &self,
        client: &AuthenticationClientData,
        return_url: &str,
    ) -> AppResult<()>;

    /// 프로바이더 콜백 검증
    fn verify_authentication(
        &self,
        client: &AuthenticationClientData,
        return_url: &str,
    ) -> AppResult<AuthenticationResult>;

    /// 콜백 요청이 담고 있는 프로바이더 이름
    ///
    /// 콜백 컨텍스트가 아니거나 이름이 없으면 None을 반환합니다.
    fn returned_provider_name(&self) -> Option<String>;
}
