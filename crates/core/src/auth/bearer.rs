//! Session token authentication.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity, TokenService};

/// Authenticator that validates the session token carried in the
/// `Authorization` header.
///
/// Accepts either:
/// - `Authorization: Bearer <token>` (any case of `Bearer`)
/// - `Authorization: <token>`
pub struct TokenAuthenticator {
    tokens: Arc<TokenService>,
}

impl TokenAuthenticator {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

/// Extract the token from an `Authorization` header value.
/// The `Bearer` scheme prefix is optional.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let value = header_value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let token = request
            .headers
            .get("authorization")
            .and_then(|value| extract_token(value))
            .ok_or(AuthError::NotAuthenticated)?;

        let subject = self
            .tokens
            .validate(token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(Identity::new(subject, self.method_name()))
    }

    fn method_name(&self) -> &'static str {
        "bearer_token"
    }
}
