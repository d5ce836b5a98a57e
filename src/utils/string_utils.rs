//! # 문자열 유틸리티
//!
//! 문자열 처리와 관련된 공통 유틸리티 함수들입니다.

use crate::errors::errors::AppError;

/// 필수 문자열 필드 검증 및 정리
///
/// 빈 문자열이나 공백만 있는 경우 ValidationError를 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 반환합니다.
///
/// # 인자
/// * `value` - 검증할 문자열
/// * `field_name` - 필드명 (에러 메시지용)
///
/// # 반환값
/// * `Ok(String)` - 정리된 유효한 문자열
/// * `Err(AppError)` - 빈 문자열이거나 공백만 있는 경우
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!(
            "{}은(는) 필수입니다",
            field_name
        )));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 옵션으로 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 문자열이 비어있지 않은 유효한 값인지 확인
pub fn is_non_empty(value: Option<&str>) -> bool {
    value.map(|s| !s.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string_trims() {
        assert_eq!(
            validate_required_string("  alice  ", "username").unwrap(),
            "alice"
        );
    }

    #[test]
    fn test_validate_required_string_rejects_blank() {
        assert!(validate_required_string("", "username").is_err());
        assert!(validate_required_string("   ", "username").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(
            clean_optional_string(Some("  salt  ".to_string())),
            Some("salt".to_string())
        );
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_is_non_empty() {
        assert!(is_non_empty(Some("hash")));
        assert!(!is_non_empty(Some("  ")));
        assert!(!is_non_empty(None));
    }
}
