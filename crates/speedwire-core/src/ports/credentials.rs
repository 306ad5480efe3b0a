//! 자격증명 조회 포트.
//!
//! 시크릿 이름 → (사용자명, 비밀번호). 조회 실패는 파이프라인 시작 전에 치명적이다.

use async_trait::async_trait;

use crate::error::CoreError;

/// remote-write 기본 인증 자격증명
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 시크릿 이름으로 자격증명을 조회
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn resolve(&self, secret_name: &str) -> Result<Credentials, CoreError>;
}

/// 설정/CLI에서 받은 값을 그대로 돌려주는 구현
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                username: username.into(),
                password: password.into(),
            },
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn resolve(&self, secret_name: &str) -> Result<Credentials, CoreError> {
        if self.credentials.username.is_empty() {
            return Err(CoreError::Validation {
                field: "username".to_string(),
                message: format!("시크릿 '{secret_name}'의 사용자명이 비어 있음"),
            });
        }
        if self.credentials.password.is_empty() {
            return Err(CoreError::Validation {
                field: "password".to_string(),
                message: format!("시크릿 '{secret_name}'의 비밀번호가 비어 있음"),
            });
        }
        tracing::debug!(secret = secret_name, "정적 자격증명 사용");
        Ok(self.credentials.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_returns_credentials() {
        let provider = StaticCredentialProvider::new("12345", "api-key");
        let creds = provider.resolve("remote-write").await.unwrap();
        assert_eq!(creds.username, "12345");
        assert_eq!(creds.password, "api-key");
    }

    #[tokio::test]
    async fn static_provider_rejects_empty_password() {
        let provider = StaticCredentialProvider::new("12345", "");
        let result = provider.resolve("remote-write").await;
        assert!(matches!(result, Err(CoreError::Validation { ref field, .. }) if field == "password"));
    }

    #[test]
    fn debug_hides_password() {
        let creds = Credentials {
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        let shown = format!("{creds:?}");
        assert!(shown.contains("user"));
        assert!(!shown.contains("secret"));
    }
}
