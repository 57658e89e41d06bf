//! Credential check and session issuance for the single configured account.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::token::{TokenError, TokenService};
use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum LoginError {
    /// Missing, empty, or wrong username/password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Validates the fixed username/password pair and issues session tokens.
pub struct LoginService {
    username: String,
    password: String,
    tokens: Arc<TokenService>,
}

impl LoginService {
    pub fn new(config: &AuthConfig, tokens: Arc<TokenService>) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            tokens,
        }
    }

    /// Check credentials and issue a token whose subject is the username.
    pub fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Session, LoginError> {
        let (Some(username), Some(password)) = (username, password) else {
            debug!("Login rejected: missing credentials");
            return Err(LoginError::InvalidCredentials);
        };

        // Evaluate both comparisons so timing does not reveal which one failed.
        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        if !(username_ok & password_ok) {
            warn!(username = %username, "Login rejected: invalid credentials");
            return Err(LoginError::InvalidCredentials);
        }

        let token = self.tokens.issue(username)?;
        Ok(Session {
            token,
            username: username.to_string(),
        })
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> LoginService {
        LoginService::new(
            &AuthConfig::default(),
            Arc::new(TokenService::new(b"test-secret")),
        )
    }

    #[test]
    fn test_valid_credentials_issue_token() {
        let login = service();
        let session = login.login(Some("admin"), Some("admin")).unwrap();

        assert_eq!(session.username, "admin");
        assert_eq!(login.tokens().validate(&session.token).unwrap(), "admin");
    }

    #[test]
    fn test_wrong_username() {
        let result = service().login(Some("wrong"), Some("admin"));
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[test]
    fn test_wrong_password() {
        let result = service().login(Some("admin"), Some("wrong"));
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
    }

    #[test]
    fn test_missing_credentials() {
        let login = service();
        assert!(login.login(None, Some("admin")).is_err());
        assert!(login.login(Some("admin"), None).is_err());
        assert!(login.login(None, None).is_err());
    }

    #[test]
    fn test_empty_credentials() {
        let login = service();
        assert!(login.login(Some(""), Some("admin")).is_err());
        assert!(login.login(Some("admin"), Some("")).is_err());
    }

    #[test]
    fn test_configured_credentials() {
        let config = AuthConfig {
            username: "ash".to_string(),
            password: "pikachu".to_string(),
            ..Default::default()
        };
        let login = LoginService::new(&config, Arc::new(TokenService::new(b"s")));

        assert!(login.login(Some("ash"), Some("pikachu")).is_ok());
        assert!(login.login(Some("admin"), Some("admin")).is_err());
    }

    #[test]
    fn test_unissuable_token_is_token_error() {
        let config = AuthConfig {
            token_secret: Some("s".to_string()),
            token_ttl_hours: u32::MAX,
            ..Default::default()
        };
        let login = LoginService::new(&config, Arc::new(TokenService::from_config(&config)));

        let result = login.login(Some("admin"), Some("admin"));
        assert!(matches!(result, Err(LoginError::Token(TokenError::Signing(_)))));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
