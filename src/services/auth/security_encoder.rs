//! 비밀번호 인코딩 서비스
//!
//! 비밀번호 해싱과 검증을 담당하는 서비스입니다.
//! bcrypt를 사용하며, 같은 (비밀번호, 솔트, 비용) 입력에 대해 항상 같은
//! 출력을 내는 결정적 인코딩을 제공합니다. 솔트는 해시와 별도로 사용자
//! 레코드에 저장됩니다.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bcrypt::Version;
use uuid::Uuid;

use crate::config::PasswordConfig;
use crate::errors::{AppError, AppResult, ErrorContext};

/// 비밀번호 인코딩 계약
///
/// 구현체를 교체하여 해싱 방식을 바꿀 수 있도록 trait으로 분리합니다.
pub trait SecurityEncoder: Send + Sync {
    /// 새 랜덤 솔트 생성
    fn generate_salt(&self) -> String;

    /// 비밀번호를 솔트와 함께 결정적으로 인코딩
    ///
    /// 같은 입력에 대해 항상 같은 결과를 반환합니다.
    fn encode(&self, raw_password: &str, salt: &str) -> AppResult<String>;

    /// 후보 비밀번호가 저장된 해시와 일치하는지 검증
    ///
    /// 타이밍 공격을 피하기 위해 상수 시간 비교를 사용합니다.
    fn is_match(&self, raw_password: &str, encoded_password: &str) -> AppResult<bool>;
}

/// bcrypt 기반 기본 인코더
pub struct DefaultSecurityEncoder {
    /// bcrypt 비용 계수 (4~15)
    cost: u32,
}

impl DefaultSecurityEncoder {
    /// 환경별 기본 비용으로 인코더 생성
    pub fn new() -> Self {
        Self {
            cost: PasswordConfig::bcrypt_cost(),
        }
    }

    /// 지정된 비용으로 인코더 생성 (테스트에서는 낮은 비용 사용)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// 솔트 문자열을 bcrypt가 요구하는 16바이트로 변환
    ///
    /// `generate_salt`가 만든 솔트는 16바이트의 base64 인코딩이므로 그대로
    /// 복원됩니다. 외부에서 주어진 임의의 솔트 문자열은 UTF-8 바이트를
    /// 순환시켜 16바이트를 채웁니다.
    fn salt_bytes(salt: &str) -> AppResult<[u8; 16]> {
        if salt.is_empty() {
            return Err(AppError::ValidationError(
                "솔트는 비어 있을 수 없습니다".to_string(),
            ));
        }

        let mut bytes = [0u8; 16];

        if let Ok(decoded) = BASE64.decode(salt) {
            if decoded.len() == 16 {
                bytes.copy_from_slice(&decoded);
                return Ok(bytes);
            }
        }

        for (slot, byte) in bytes.iter_mut().zip(salt.bytes().cycle()) {
            *slot = byte;
        }
        Ok(bytes)
    }
}

impl Default for DefaultSecurityEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityEncoder for DefaultSecurityEncoder {
    fn generate_salt(&self) -> String {
        BASE64.encode(Uuid::new_v4().into_bytes())
    }

    fn encode(&self, raw_password: &str, salt: &str) -> AppResult<String> {
        let salt = Self::salt_bytes(salt)?;

        let parts =
            bcrypt::hash_with_salt(raw_password, self.cost, salt).context("비밀번호 해싱 실패")?;

        Ok(parts.format_for_version(Version::TwoB))
    }

    fn is_match(&self, raw_password: &str, encoded_password: &str) -> AppResult<bool> {
        bcrypt::verify(raw_password, encoded_password)
            .map_err(|e| AppError::AuthenticationError(format!("비밀번호 검증 실패: {}", e)))
    }
}
