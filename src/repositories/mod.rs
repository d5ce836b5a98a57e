//! 데이터 액세스 계층을 담당하는 저장소 모듈
//!
//! 멤버십 코어는 저장소 백엔드에 독립적입니다. [`contracts`]의
//! [`UserStore`](contracts::UserStore)와 [`RoleStore`](contracts::RoleStore)
//! 계약만을 바라보며, 백엔드별 어댑터가 계약을 구현합니다.
//!
//! # Adapters
//!
//! - [`mongo`] - MongoDB 문서 저장소 어댑터
//! - [`memory`] - 테스트용 인메모리 어댑터
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::repositories::contracts::UserStore;
//! use crate::repositories::mongo::MongoMembershipStore;
//!
//! let store: Arc<dyn UserStore> = Arc::new(MongoMembershipStore::new(database));
//! let user = store.get_user_by_username("alice").await?;
//! ```

pub mod contracts;
pub mod memory;
pub mod mongo;

pub use contracts::*;
