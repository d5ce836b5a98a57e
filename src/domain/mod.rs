//! # Domain Layer Module
//!
//! 도메인 계층을 구성하는 핵심 모듈로, 멤버십 비즈니스 규칙을 담당합니다.
//!
//! ## 모듈 구성
//!
//! - [`entities`] - 영속 가능한 핵심 도메인 객체 (User, Role)
//! - [`dto`] - 검증이 적용되는 요청 데이터 구조
//! - [`models`] - 외부 협력자와 주고받는 인증 결과 모델
//!
//! ## 설계 원칙
//!
//! - **영속성**: 엔티티는 저장소 어댑터가 그대로 저장할 수 있는 형태
//! - **명시적 변환**: 리플렉션 기반 복사 대신 필드 단위 병합 함수 사용
//! - **Null Safety**: `Option<T>`를 통한 안전한 부재 표현

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
