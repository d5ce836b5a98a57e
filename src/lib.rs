//! 플러그형 멤버십 서비스 백엔드
//!
//! 저장소에 독립적인 사용자/역할 저장 계약 위에 로컬 계정 인증,
//! OAuth 계정 연결, 비밀번호 재설정 흐름을 제공하는 라이브러리입니다.
//! 웹 프레임워크와의 결합 지점(세션 발급, OAuth 리디렉션)은
//! [`environment::ApplicationEnvironment`] trait 뒤로 분리되어 있습니다.
//!
//! # Features
//!
//! - **로컬 계정**: 계정 생성, 로그인, 비밀번호 변경/재설정
//! - **OAuth 연결**: 외부 identity 연결/해제, OAuth 로그인, 락아웃 가드
//! - **역할 관리**: 역할 생성/삭제, 멤버십 추가/제거, 멱등 연산
//! - **저장소 계약**: MongoDB 어댑터와 테스트용 인메모리 어댑터 제공
//! - **결정적 해싱**: bcrypt 기반 솔트 분리 비밀번호 인코딩
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ ApplicationEnvironment│ ← 세션/OAuth 전송 (외부 협력자)
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │  MembershipService   │ ← 인증 흐름 오케스트레이션
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │ UserStore / RoleStore │ ← 저장소 계약
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │  MongoDB / In-memory  │ ← 어댑터
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use membership_service_backend::db::Database;
//! use membership_service_backend::repositories::mongo::MongoMembershipStore;
//! use membership_service_backend::services::auth::DefaultSecurityEncoder;
//! use membership_service_backend::services::membership::{
//!     AuthenticationClientData, MembershipService, ProviderRegistry,
//! };
//!
//! let database = Arc::new(Database::new().await?);
//! let store = Arc::new(MongoMembershipStore::new(database));
//! store.create_indexes().await?;
//!
//! let mut providers = ProviderRegistry::new();
//! providers.register(AuthenticationClientData::new("google", "Google"))?;
//!
//! let service = MembershipService::new(
//!     store,
//!     Arc::new(DefaultSecurityEncoder::new()),
//!     web_environment,
//!     Arc::new(providers),
//! );
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod environment;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;
