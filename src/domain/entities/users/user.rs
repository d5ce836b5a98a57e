//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 인증(비밀번호)과 OAuth 연결 계정을 모두 지원하는 통합된 사용자 모델을 제공합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::string_utils::is_non_empty;

/// 외부 프로바이더 계정 연결
///
/// 로컬 사용자와 외부 identity provider의 사용자 ID 사이의 연결입니다.
/// (provider, provider_user_id) 쌍은 저장소 전체에서 유일합니다.
/// 하나의 외부 identity는 최대 한 명의 로컬 사용자에게만 연결됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAccount {
    /// 프로바이더 이름 (대소문자 구분)
    pub provider: String,
    /// 프로바이더가 부여한 사용자 ID
    pub provider_user_id: String,
}

impl OAuthAccount {
    pub fn new(provider: impl Into<String>, provider_user_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            provider_user_id: provider_user_id.into(),
        }
    }

    /// 주어진 (provider, provider_user_id) 쌍과 일치하는지 확인
    pub fn matches(&self, provider: &str, provider_user_id: &str) -> bool {
        self.provider == provider && self.provider_user_id == provider_user_id
    }
}

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// 사용자명은 저장소 전체에서 유일하며 대소문자를 구분하여 정확히 일치시킵니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 저장소가 부여하는 식별자
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자명 (unique, 대소문자 구분)
    pub username: String,
    /// 해시된 비밀번호 (OAuth 전용 사용자의 경우 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// 비밀번호 솔트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_salt: Option<String>,
    /// 비밀번호 재설정 토큰
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_token: Option<String>,
    /// 재설정 토큰 만료 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_token_expiration: Option<DateTime>,
    /// 로컬 비밀번호로 가입한 사용자인지 여부
    pub is_local: bool,
    /// 연결된 OAuth 계정 목록 (연결 순서 유지)
    #[serde(default)]
    pub oauth_accounts: Vec<OAuthAccount>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl User {
    /// 새 로컬 사용자 생성 (사용자명/비밀번호)
    ///
    /// 비밀번호는 이미 해시된 상태로 전달되어야 합니다.
    pub fn new_local(username: String, password_hash: String, password_salt: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username,
            password_hash: Some(password_hash),
            password_salt: Some(password_salt),
            password_reset_token: None,
            password_reset_token_expiration: None,
            is_local: true,
            oauth_accounts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 첫 OAuth 로그인으로 생성되는 사용자
    ///
    /// 로컬 비밀번호 없이 생성되며, 호출자가 이어서 OAuth 계정을 연결합니다.
    pub fn new_oauth_shell(username: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username,
            password_hash: None,
            password_salt: None,
            password_reset_token: None,
            password_reset_token_expiration: None,
            is_local: false,
            oauth_accounts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 비어있지 않은 로컬 비밀번호를 가지고 있는지 확인
    ///
    /// OAuth 연결 해제의 락아웃 가드가 이 판정을 사용합니다.
    pub fn has_local_password(&self) -> bool {
        is_non_empty(self.password_hash.as_deref())
    }

    /// 주어진 외부 identity가 이미 연결되어 있는지 확인
    pub fn has_oauth_account(&self, provider: &str, provider_user_id: &str) -> bool {
        self.oauth_accounts
            .iter()
            .any(|a| a.matches(provider, provider_user_id))
    }

    /// OAuth 계정 연결 (이미 연결된 경우 no-op)
    pub fn link_oauth_account(&mut self, provider: &str, provider_user_id: &str) {
        if !self.has_oauth_account(provider, provider_user_id) {
            self.oauth_accounts
                .push(OAuthAccount::new(provider, provider_user_id));
            self.updated_at = DateTime::now();
        }
    }

    /// OAuth 계정 연결 해제
    ///
    /// 연결이 존재했으면 true를 반환합니다. 락아웃 가드는 저장소 계층의
    /// 책임이므로 여기서는 검사하지 않습니다.
    pub fn unlink_oauth_account(&mut self, provider: &str, provider_user_id: &str) -> bool {
        let before = self.oauth_accounts.len();
        self.oauth_accounts
            .retain(|a| !a.matches(provider, provider_user_id));
        let removed = self.oauth_accounts.len() < before;
        if removed {
            self.updated_at = DateTime::now();
        }
        removed
    }

    /// 다른 레코드의 쓰기 가능한 필드를 이 레코드로 병합
    ///
    /// 저장소 계약의 `save`가 사용하는 명시적 필드 단위 병합입니다.
    /// 식별자와 생성 시각은 저장된 레코드의 것을 유지하고,
    /// 나머지 모든 가변 속성은 전달된 레코드의 값으로 덮어씁니다.
    pub fn merge_from(&mut self, other: &User) {
        self.password_hash = other.password_hash.clone();
        self.password_salt = other.password_salt.clone();
        self.password_reset_token = other.password_reset_token.clone();
        self.password_reset_token_expiration = other.password_reset_token_expiration;
        self.is_local = other.is_local;
        self.oauth_accounts = other.oauth_accounts.clone();
        self.updated_at = DateTime::now();
    }
}
