//! MongoDB 멤버십 저장소
//!
//! [`UserStore`]와 [`RoleStore`] 계약의 MongoDB 구현입니다.
//! `users` 컬렉션과 `roles` 컬렉션을 사용하며, 역할 멤버십은 역할 문서 안에
//! 사용자 `ObjectId` 배열로 비정규화되어 저장됩니다.
//!
//! ## 데이터 무결성
//!
//! - **사용자명/역할명 유니크 인덱스**: `create_indexes`가 생성합니다.
//!   `add`/`create_role`의 사전 중복 검사와 함께 이중 방어를 구성하며,
//!   유니크 인덱스가 동시 삽입 경합의 최종 방어선입니다. 이 어댑터는
//!   멀티 도큐먼트 트랜잭션을 사용하지 않으므로 검사와 삽입 사이의 짧은
//!   경합 윈도우가 존재합니다.
//! - **OAuth identity 유일성**: (provider, provider_user_id) 쌍은 연결 전
//!   소유자 조회로 강제합니다.
//!
//! ## 일관성
//!
//! 호출 간 캐시가 없으므로 조회 신선도는 MongoDB 배포의 일관성 모델을
//! 따릅니다. read-your-writes가 필요하면 [`Database`]의 majority read
//! concern 옵션을 켜야 합니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::roles::role::Role;
use crate::domain::entities::users::user::{OAuthAccount, User};
use crate::errors::{AppError, AppResult};
use crate::repositories::contracts::{RoleStore, UserStore};
use crate::utils::string_utils::validate_required_string;

/// 사용자 컬렉션 이름
const USERS_COLLECTION: &str = "users";
/// 역할 컬렉션 이름
const ROLES_COLLECTION: &str = "roles";

/// MongoDB 멤버십 저장소
///
/// 하나의 구조체가 사용자 저장소와 역할 저장소 계약을 모두 구현합니다.
pub struct MongoMembershipStore {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,
}

impl MongoMembershipStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(USERS_COLLECTION)
    }

    fn roles(&self) -> Collection<Role> {
        self.db.collection::<Role>(ROLES_COLLECTION)
    }

    /// (provider, provider_user_id) 쌍으로 사용자를 찾는 쿼리
    fn oauth_filter(provider: &str, provider_user_id: &str) -> mongodb::bson::Document {
        doc! {
            "oauth_accounts": {
                "$elemMatch": {
                    "provider": provider,
                    "provider_user_id": provider_user_id,
                }
            }
        }
    }

    /// 기존 사용자 레코드를 전체 교체로 영속화
    async fn replace_user(&self, user: &User) -> AppResult<()> {
        let id = user.id.ok_or_else(|| {
            AppError::InternalError(format!(
                "user '{}' has no storage identifier",
                user.username
            ))
        })?;

        self.users()
            .replace_one(doc! { "_id": id }, user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// 기존 역할 레코드를 전체 교체로 영속화
    async fn replace_role(&self, role: &Role) -> AppResult<()> {
        let id = role.id.ok_or_else(|| {
            AppError::InternalError(format!("role '{}' has no storage identifier", role.name))
        })?;

        self.roles()
            .replace_one(doc! { "_id": id }, role)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn find_role(&self, role_name: &str) -> AppResult<Option<Role>> {
        self.roles()
            .find_one(doc! { "name": role_name })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 사용자명 목록을 저장소의 ObjectId 목록으로 해석
    async fn resolve_user_ids(&self, usernames: &[String]) -> AppResult<Vec<ObjectId>> {
        let cursor = self
            .users()
            .find(doc! { "username": { "$in": usernames } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let users: Vec<User> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(users.into_iter().filter_map(|u| u.id).collect())
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 실행합니다.
    /// 사용자명과 역할명의 유니크 인덱스를 생성합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("username_unique".to_string())
                    .build(),
            )
            .build();

        self.users()
            .create_indexes([username_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let role_name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("role_name_unique".to_string())
                    .build(),
            )
            .build();

        self.roles()
            .create_indexes([role_name_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoMembershipStore {
    async fn add(&self, mut user: User) -> AppResult<User> {
        validate_required_string(&user.username, "username")?;

        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(AppError::ConflictError(format!(
                "User '{}' already exists",
                user.username
            )));
        }

        let result = self
            .users()
            .insert_one(&user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(id) = result.inserted_id.as_object_id() {
            user.id = Some(id);
        }
        Ok(user)
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let mut existing = self
            .get_user_by_username(&user.username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No user by username '{}' found", user.username))
            })?;

        existing.merge_from(&user);
        self.replace_user(&existing).await?;
        Ok(existing)
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.users()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn get_user_by_password_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        self.users()
            .find_one(doc! { "password_reset_token": token })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn get_user_by_oauth_provider(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        self.users()
            .find_one(Self::oauth_filter(provider, provider_user_id))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn get_oauth_accounts_for_user(&self, username: &str) -> AppResult<Vec<OAuthAccount>> {
        let user = self
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user by username '{}' found", username)))?;
        Ok(user.oauth_accounts)
    }

    async fn attach_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        user: User,
    ) -> AppResult<User> {
        if let Some(owner) = self
            .get_user_by_oauth_provider(provider, provider_user_id)
            .await?
        {
            if owner.username != user.username {
                return Err(AppError::ConflictError(format!(
                    "OAuth identity '{}/{}' is already linked to another user",
                    provider, provider_user_id
                )));
            }
        }

        let mut stored = self
            .get_user_by_username(&user.username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No user by username '{}' found", user.username))
            })?;

        stored.link_oauth_account(provider, provider_user_id);
        self.replace_user(&stored).await?;
        Ok(stored)
    }

    async fn create_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
        username: &str,
    ) -> AppResult<User> {
        validate_required_string(username, "username")?;

        if let Some(owner) = self
            .get_user_by_oauth_provider(provider, provider_user_id)
            .await?
        {
            if owner.username != username {
                return Err(AppError::ConflictError(format!(
                    "OAuth identity '{}/{}' is already linked to another user",
                    provider, provider_user_id
                )));
            }
        }

        let mut user = match self.get_user_by_username(username).await? {
            Some(user) => user,
            None => self.add(User::new_oauth_shell(username.to_string())).await?,
        };

        user.link_oauth_account(provider, provider_user_id);
        self.replace_user(&user).await?;
        Ok(user)
    }

    async fn delete_oauth_account(
        &self,
        provider: &str,
        provider_user_id: &str,
    ) -> AppResult<bool> {
        let Some(mut user) = self
            .get_user_by_oauth_provider(provider, provider_user_id)
            .await?
        else {
            return Ok(false);
        };

        // 락아웃 가드: 마지막 남은 인증 수단은 제거하지 않는다
        if user.oauth_accounts.len() > 1 || user.has_local_password() {
            let removed = user.unlink_oauth_account(provider, provider_user_id);
            if removed {
                self.replace_user(&user).await?;
            }
            Ok(removed)
        } else {
            Ok(false)
        }
    }
}

#[async_trait]
impl RoleStore for MongoMembershipStore {
    async fn create_role(&self, role_name: &str) -> AppResult<()> {
        validate_required_string(role_name, "role name")?;

        if self.find_role(role_name).await?.is_some() {
            return Err(AppError::ConflictError(format!(
                "Role '{}' already exists",
                role_name
            )));
        }

        self.roles()
            .insert_one(&Role::new(role_name))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn get_roles_for_user(&self, username: &str) -> AppResult<Vec<String>> {
        let Some(user) = self.get_user_by_username(username).await? else {
            return Ok(Vec::new());
        };
        let Some(user_id) = user.id else {
            return Ok(Vec::new());
        };

        let cursor = self
            .roles()
            .find(doc! { "users": user_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let roles: Vec<Role> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut names: Vec<String> = roles.into_iter().map(|r| r.name).collect();
        names.sort();
        Ok(names)
    }

    async fn get_users_in_role(&self, role_name: &str) -> AppResult<Vec<String>> {
        let Some(role) = self.find_role(role_name).await? else {
            return Ok(Vec::new());
        };
        if role.users.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": role.users } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let users: Vec<User> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(users.into_iter().map(|u| u.username).collect())
    }

    async fn get_all_roles(&self) -> AppResult<Vec<String>> {
        let cursor = self
            .roles()
            .find(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let roles: Vec<Role> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut names: Vec<String> = roles.into_iter().map(|r| r.name).collect();
        names.sort();
        Ok(names)
    }

    async fn add_users_to_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()> {
        let user_ids = self.resolve_user_ids(usernames).await?;

        for role_name in role_names {
            let mut role = self.find_role(role_name).await?.ok_or_else(|| {
                AppError::NotFound(format!("No role named '{}' found", role_name))
            })?;

            let mut changed = false;
            for user_id in &user_ids {
                changed |= role.add_member(*user_id);
            }
            if changed {
                self.replace_role(&role).await?;
            }
        }
        Ok(())
    }

    async fn remove_users_from_roles(
        &self,
        usernames: &[String],
        role_names: &[String],
    ) -> AppResult<()> {
        let user_ids = self.resolve_user_ids(usernames).await?;

        for role_name in role_names {
            let mut role = self.find_role(role_name).await?.ok_or_else(|| {
                AppError::NotFound(format!("No role named '{}' found", role_name))
            })?;

            let mut changed = false;
            for user_id in &user_ids {
                changed |= role.remove_member(user_id);
            }
            if changed {
                self.replace_role(&role).await?;
            }
        }
        Ok(())
    }

    async fn role_exists(&self, role_name: &str) -> AppResult<bool> {
        Ok(self.find_role(role_name).await?.is_some())
    }

    async fn delete_role(&self, role_name: &str) -> AppResult<bool> {
        // 멤버십은 역할 문서 안에 있으므로 문서 삭제로 참조가 모두 사라진다
        let result = self
            .roles()
            .delete_one(doc! { "name": role_name })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}
