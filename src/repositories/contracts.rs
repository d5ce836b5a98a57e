//! 저장소 계약 정의
//!
//! 사용자/역할 저장소가 백엔드와 무관하게 지켜야 하는 연산 의미론을
//! 정의합니다. 각 메서드는 하나의 범위가 한정된 작업 단위로 실행되며,
//! 호출 사이에 상태를 공유하지 않습니다. 일시적 저장소 오류는 재시도 없이
//! 호출자에게 그대로 전파됩니다.

use async_trait::async_trait;

use crate::domain::entities::users::user::{OAuthAccount, User};
use crate::errors::AppResult;

/// 사용자 레코드 저장소 계약
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자를 저장소에 추가합니다.
    ///
    /// # Errors
    ///
    /// * `ConflictError` - 같은 사용자명의 사용자가 이미 존재
    /// * `ValidationError` - 사용자명이 비어 있음
    async fn add(&self, user: User) -> AppResult<User>;

    /// 기존 사용자에 대한 수정 사항을 저장합니다.
    ///
    /// 사용자명을 키로 기존 레코드를 찾아, 전달된 레코드의 모든 쓰기 가능
    /// 필드를 덮어쓰는 전체 병합을 수행합니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 사용자명의 사용자가 존재하지 않음
    async fn save(&self, user: User) -> AppResult<User>;

    /// 사용자명으로 사용자를 조회합니다. 정확히 일치(대소문자 구분)합니다.
    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// 비밀번호 재설정 토큰으로 사용자를 조회합니다.
    async fn get_user_by_password_reset_token(&self, token: &str) -> AppResult<Option<User>>;

    /// 연결된 외부 identity로 사용자를 조회합니다.
    async fn get_user_by_oauth_provider(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<User>>;

    /// 사용자의 연결된 OAuth 계정 목록을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 사용자명의 사용자가 존재하지 않음
    async fn get_oauth_accounts_for_user(&self, username: &str) -> AppResult<Vec<OAuthAccount>>;

    /// 이미 조회한 사용자 객체에 OAuth 계정을 연결하고 영속화합니다.
    ///
    /// 같은 identity가 이미 이 사용자에게 연결되어 있으면 no-op입니다.
    ///
    /// # Errors
    ///
    /// * `ConflictError` - 해당 identity가 다른 사용자에게 연결되어 있음
    async fn attach_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        user: User,
    ) -> AppResult<User>;

    /// 사용자명으로 사용자를 찾거나 새로 만든 뒤 OAuth 계정을 연결합니다.
    ///
    /// 사용자가 없으면 로컬 비밀번호 없는 사용자를 생성합니다.
    ///
    /// # Errors
    ///
    /// * `ConflictError` - 해당 identity가 다른 사용자에게 연결되어 있음
    async fn create_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        username: &str,
    ) -> AppResult<User>;

    /// OAuth 계정 연결을 제거합니다.
    ///
    /// 락아웃 가드: 소유 사용자가 두 개 이상의 연결을 갖고 있거나 비어있지
    /// 않은 로컬 비밀번호를 갖고 있을 때만 제거하고 true를 반환합니다.
    /// 마지막 남은 인증 수단이라면 변경 없이 false를 반환합니다.
    /// 일치하는 연결이 없는 경우에도 false를 반환합니다.
    async fn delete_oauth_account(&self, provider: &str, provider_user_id: &str)
        -> AppResult<bool>;
}

/// 역할 저장소 계약
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// 새 역할을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `ConflictError` - 같은 이름의 역할이 이미 존재
    async fn create_role(&self, role_name: &str) -> AppResult<()>;

    /// 사용자가 속한 역할 이름 목록을 반환합니다.
    ///
    /// 알 수 없는 사용자에 대해서는 빈 목록을 반환합니다.
    async fn get_roles_for_user(&self, username: &str) -> AppResult<Vec<String>>;

    /// 역할에 속한 사용자명 목록을 반환합니다.
    ///
    /// 알 수 없는 역할에 대해서는 빈 목록을 반환합니다.
    async fn get_users_in_role(&self, role_name: &str) -> AppResult<Vec<String>>;

    /// 모든 역할 이름을 반환합니다.
    async fn get_all_roles(&self) -> AppResult<Vec<String>>;

    /// 사용자들을 역할들에 추가합니다. 멱등 연산입니다.
    ///
    /// 저장소에 존재하는 사용자만 멤버십에 반영됩니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 이름에 해당하는 역할이 존재하지 않음
    async fn add_users_to_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()>;

    /// 사용자들을 역할들에서 제거합니다. 멱등 연산이며,
    /// 이미 멤버가 아닌 사용자는 조용히 건너뜁니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 이름에 해당하는 역할이 존재하지 않음
    async fn remove_users_from_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()>;

    /// 역할 존재 여부를 확인합니다.
    async fn role_exists(&self, role_name: &str) -> AppResult<bool>;

    /// 역할을 삭제합니다.
    ///
    /// 해당 이름의 역할이 존재해서 제거되었으면 true를 반환합니다.
    /// 멤버십 참조는 역할 문서 안에 비정규화되어 있으므로 삭제 구현이
    /// 함께 정리해야 하며, 호출자에게 맡기지 않습니다.
    async fn delete_role(&self, role_name: &str) -> AppResult<bool>;
}
