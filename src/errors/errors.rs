//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 멤버십 백엔드를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`를 사용하여 타입 안전하고 일관된 에러 처리를 제공합니다.
//!
//! ## 에러 분류
//!
//! - **NotFound**: 요청한 사용자/역할/OAuth 연결이 존재하지 않음.
//!   기본값으로 대체하지 않고 항상 명시적으로 전달합니다.
//! - **ConflictError**: 사용자명/역할명 유니크 제약 위반. 재시도 없이 즉시 전달.
//! - **ValidationError**: 빈 사용자명 등 입력값 검증 실패.
//! - **AuthenticationError**: 자격 증명 처리 관련 오류 (해싱 실패 등).
//! - **DatabaseError**: 저장소 어댑터에서 발생한 오류.
//!   이 계층에서는 재시도하지 않고 호출자에게 그대로 전파합니다.
//! - **InternalError**: 예상하지 못한 시스템 오류.
//!
//! 정책에 의한 거부(예: 락아웃 가드에 막힌 OAuth 연결 해제)는 에러가 아니라
//! `Ok(false)`로 표현합니다. 기대 가능한 거부와 예외적 실패를 구분하기 위함입니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn create_account(username: &str) -> Result<User, AppError> {
//!     if username.trim().is_empty() {
//!         return Err(AppError::ValidationError("Username is required".to_string()));
//!     }
//!
//!     let user = store.add(user).await?;
//!     Ok(user)
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 멤버십 서비스와 저장소 계약에서 발생할 수 있는 모든 종류의 에러를
/// 포괄하는 열거형입니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 에러
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 내부 서버 에러
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// NotFound 에러인지 확인
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// ConflictError 에러인지 확인
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::ConflictError(_))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
