//! Role Entity Implementation
//!
//! 역할 엔티티의 핵심 구현체입니다.
//! 멤버 식별자 타입은 백엔드에 따라 다릅니다. MongoDB 어댑터는 사용자
//! `ObjectId`를, 인메모리 어댑터는 사용자명을 저장합니다.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 역할 엔티티
///
/// 역할 이름은 저장소 전체에서 유일합니다. 멤버십은 역할 문서 안에
/// 식별자 집합으로 비정규화되어 저장되므로, 역할 삭제 시 멤버십 참조도
/// 함께 사라집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role<M = ObjectId> {
    /// 저장소가 부여하는 식별자
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 역할 이름 (unique)
    pub name: String,
    /// 멤버 식별자 집합
    #[serde(default = "Vec::new")]
    pub users: Vec<M>,
}

impl<M: PartialEq> Role<M> {
    /// 빈 멤버십으로 새 역할 생성
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            users: Vec::new(),
        }
    }

    /// 멤버 추가 (이미 존재하면 no-op)
    ///
    /// 추가가 실제로 일어났으면 true를 반환합니다.
    pub fn add_member(&mut self, member: M) -> bool {
        if self.users.contains(&member) {
            return false;
        }
        self.users.push(member);
        true
    }

    /// 멤버 제거 (존재하지 않으면 no-op)
    pub fn remove_member(&mut self, member: &M) -> bool {
        let before = self.users.len();
        self.users.retain(|m| m != member);
        self.users.len() < before
    }

    /// 멤버 포함 여부 확인
    pub fn has_member(&self, member: &M) -> bool {
        self.users.contains(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_member_is_idempotent() {
        let mut role: Role<String> = Role::new("admin");

        assert!(role.add_member("alice".to_string()));
        assert!(!role.add_member("alice".to_string()));
        assert_eq!(role.users.len(), 1);
    }

    #[test]
    fn test_remove_absent_member_is_noop() {
        let mut role: Role<String> = Role::new("admin");
        role.add_member("alice".to_string());

        assert!(!role.remove_member(&"bob".to_string()));
        assert!(role.remove_member(&"alice".to_string()));
        assert!(role.users.is_empty());
    }

    #[test]
    fn test_object_id_members() {
        let mut role: Role = Role::new("operators");
        let uid = ObjectId::new();

        assert!(role.add_member(uid));
        assert!(role.has_member(&uid));
    }
}
