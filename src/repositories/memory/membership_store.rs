//! 인메모리 멤버십 저장소
//!
//! [`UserStore`]와 [`RoleStore`] 계약의 인메모리 구현입니다.
//! 외부 프로세스 없이 계약 의미론을 그대로 제공하므로 테스트와 로컬 개발에
//! 사용합니다. 역할 멤버십은 사용자명으로 저장합니다.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::domain::entities::roles::role::Role;
use crate::domain::entities::users::user::{OAuthAccount, User};
use crate::errors::{AppError, AppResult};
use crate::repositories::contracts::{RoleStore, UserStore};
use crate::utils::string_utils::validate_required_string;

#[derive(Default)]
struct MemoryState {
    /// 사용자명 → 사용자 레코드
    users: HashMap<String, User>,
    /// 역할 이름 → 역할 레코드 (멤버는 사용자명)
    roles: HashMap<String, Role<String>>,
}

/// 인메모리 멤버십 저장소
///
/// 각 메서드는 뮤텍스 범위 하나를 작업 단위로 사용합니다.
/// 락을 잡은 채로 await 지점을 넘어가지 않습니다.
#[derive(Default)]
pub struct InMemoryMembershipStore {
    state: Mutex<MemoryState>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| AppError::InternalError("인메모리 저장소 뮤텍스가 오염되었습니다".to_string()))
    }

    fn owner_of_oauth_account(
        state: &MemoryState,
        provider: &str,
        provider_user_id: &str,
    ) -> Option<String> {
        state
            .users
            .values()
            .find(|u| u.has_oauth_account(provider, provider_user_id))
            .map(|u| u.username.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryMembershipStore {
    async fn add(&self, mut user: User) -> AppResult<User> {
        validate_required_string(&user.username, "username")?;

        let mut state = self.lock()?;
        if state.users.contains_key(&user.username) {
            return Err(AppError::ConflictError(format!(
                "User '{}' already exists",
                user.username
            )));
        }

        if user.id.is_none() {
            user.id = Some(ObjectId::new());
        }
        state.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let mut state = self.lock()?;
        let existing = state.users.get_mut(&user.username).ok_or_else(|| {
            AppError::NotFound(format!("No user by username '{}' found", user.username))
        })?;

        existing.merge_from(&user);
        Ok(existing.clone())
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.lock()?;
        Ok(state.users.get(username).cloned())
    }

    async fn get_user_by_password_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|u| u.password_reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn get_user_by_oauth_provider(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        let state = self.lock()?;
        Ok(state
            .users
            .values()
            .find(|u| u.has_oauth_account(provider, provider_user_id))
            .cloned())
    }

    async fn get_oauth_accounts_for_user(&self, username: &str) -> AppResult<Vec<OAuthAccount>> {
        let state = self.lock()?;
        let user = state
            .users
            .get(username)
            .ok_or_else(|| AppError::NotFound(format!("No user by username '{}' found", username)))?;
        Ok(user.oauth_accounts.clone())
    }

    async fn attach_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        user: User,
    ) -> AppResult<User> {
        let mut state = self.lock()?;

        if let Some(owner) = Self::owner_of_oauth_account(&state, provider, provider_user_id) {
            if owner != user.username {
                return Err(AppError::ConflictError(format!(
                    "OAuth identity '{}/{}' is already linked to another user",
                    provider, provider_user_id
                )));
            }
        }

        let stored = state.users.get_mut(&user.username).ok_or_else(|| {
            AppError::NotFound(format!("No user by username '{}' found", user.username))
        })?;
        stored.link_oauth_account(provider, provider_user_id);
        Ok(stored.clone())
    }

    async fn create_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        username: &str,
    ) -> AppResult<User> {
        validate_required_string(username, "username")?;

        let mut state = self.lock()?;

        if let Some(owner) = Self::owner_of_oauth_account(&state, provider, provider_user_id) {
            if owner != username {
                return Err(AppError::ConflictError(format!(
                    "OAuth identity '{}/{}' is already linked to another user",
                    provider, provider_user_id
                )));
            }
        }

        let user = state
            .users
            .entry(username.to_string())
            .or_insert_with(|| {
                let mut shell = User::new_oauth_shell(username.to_string());
                shell.id = Some(ObjectId::new());
                shell
            });
        user.link_oauth_account(provider, provider_user_id);
        Ok(user.clone())
    }

    async fn delete_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<bool> {
        let mut state = self.lock()?;

        let Some(owner) = Self::owner_of_oauth_account(&state, provider, provider_user_id) else {
            return Ok(false);
        };

        let user = state
            .users
            .get_mut(&owner)
            .ok_or_else(|| AppError::InternalError("owner disappeared during unlink".to_string()))?;

        // 락아웃 가드: 마지막 남은 인증 수단은 제거하지 않는다
        if user.oauth_accounts.len() > 1 || user.has_local_password() {
            Ok(user.unlink_oauth_account(provider, provider_user_id))
        } else {
            Ok(false)
        }
    }
}

#[async_trait]
impl RoleStore for InMemoryMembershipStore {
    async fn create_role(&self, role_name: &str) -> AppResult<()> {
        validate_required_string(role_name, "role name")?;

        let mut state = self.lock()?;
        if state.roles.contains_key(role_name) {
            return Err(AppError::ConflictError(format!(
                "Role '{}' already exists",
                role_name
            )));
        }

        state
            .roles
            .insert(role_name.to_string(), Role::new(role_name));
        Ok(())
    }

    async fn get_roles_for_user(&self, username: &str) -> AppResult<Vec<String>> {
        let state = self.lock()?;
        let mut names: Vec<String> = state
            .roles
            .values()
            .filter(|r| r.has_member(&username.to_string()))
            .map(|r| r.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn get_users_in_role(&self, role_name: &str) -> AppResult<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .roles
            .get(role_name)
            .map(|r| r.users.clone())
            .unwrap_or_default())
    }

    async fn get_all_roles(&self) -> AppResult<Vec<String>> {
        let state = self.lock()?;
        let mut names: Vec<String> = state.roles.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn add_users_to_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()> {
        let mut state = self.lock()?;

        // 존재하는 사용자만 멤버십에 반영
        let resolved: Vec<String> = usernames
            .iter()
            .filter(|u| state.users.contains_key(*u))
            .cloned()
            .collect();

        for role_name in role_names {
            let role = state
                .roles
                .get_mut(role_name)
                .ok_or_else(|| AppError::NotFound(format!("No role named '{}' found", role_name)))?;
            for username in &resolved {
                role.add_member(username.clone());
            }
        }
        Ok(())
    }

    async fn remove_users_from_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()> {
        let mut state = self.lock()?;

        for role_name in role_names {
            let role = state
                .roles
                .get_mut(role_name)
                .ok_or_else(|| AppError::NotFound(format!("No role named '{}' found", role_name)))?;
            for username in usernames {
                role.remove_member(username);
            }
        }
        Ok(())
    }

    async fn role_exists(&self, role_name: &str) -> AppResult<bool> {
        let state = self.lock()?;
        Ok(state.roles.contains_key(role_name))
    }

    async fn delete_role(&self, role_name: &str) -> AppResult<bool> {
        let mut state = self.lock()?;
        // 멤버십은 역할 레코드 안에 있으므로 제거만으로 참조가 모두 사라진다
        Ok(state.roles.remove(role_name).is_some())
    }
}
