//! 데이터 및 보안 설정 관리 모듈
//!
//! 실행 환경, 데이터베이스, 패스워드 해싱 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "production".to_string())
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// 패스워드 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// 현재 환경에 맞는 bcrypt cost를 반환합니다.
    ///
    /// # Returns
    ///
    /// 4-15 범위의 bcrypt cost 값
    ///
    /// # Environment Defaults
    ///
    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10 (중간 보안)
    /// - Production: 12 (고보안)
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if cost >= 4 && cost <= 15 {
                    return cost;
                }
            }
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    /// 특정 환경에 대한 bcrypt cost를 반환합니다.
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// MongoDB 저장소 어댑터 설정
///
/// 연결 정보와 일관성 옵션을 관리합니다.
/// 이 계층은 호출 간 캐시를 유지하지 않으므로 조회 결과의 신선도는
/// 백엔드의 일관성 모델에 의해 결정됩니다. read-your-writes가 필요한
/// 배포에서는 majority read concern 옵션을 명시적으로 켜야 합니다.
pub struct DatabaseConfig;

impl DatabaseConfig {
    /// MongoDB 연결 URI를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `MONGODB_URI`: 연결 URI (기본값: "mongodb://localhost:27017")
    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    /// 사용할 데이터베이스 이름을 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_NAME`: 데이터베이스 이름 (기본값: "membership_dev")
    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "membership_dev".to_string())
    }

    /// majority read concern 사용 여부를 반환합니다.
    ///
    /// 복제 셋 환경에서 read-your-writes 일관성이 필요한 경우
    /// `MONGODB_MAJORITY_READ_CONCERN=true`로 설정합니다. 기본값은 꺼짐이며,
    /// 이 경우 일관성은 배포 토폴로지에 따릅니다.
    pub fn majority_read_concern() -> bool {
        env::var("MONGODB_MAJORITY_READ_CONCERN")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_cost_for_env() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(
            PasswordConfig::bcrypt_cost_for_env(&Environment::Production),
            12
        );
    }
}
