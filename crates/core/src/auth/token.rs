//! Signed, expiring session tokens (HS256 JWT).

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;

/// Default session lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Wrong signature, unparsable payload, or expired. Deliberately carries
    /// no detail so callers cannot tell the cases apart.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (seconds since UNIX epoch)
    pub iat: i64,
    /// Expiration time (seconds since UNIX epoch)
    pub exp: i64,
}

/// Issues and validates session tokens with a process-wide secret.
///
/// Validation is a pure function of the token, the secret and the current
/// time; there is no revocation list.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Token service for the configured secret and lifetime. Without a
    /// configured secret a random one is generated, so sessions do not
    /// survive a restart.
    pub fn from_config(config: &AuthConfig) -> Self {
        let tokens = match config.token_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Self::new(secret.as_bytes()),
            _ => {
                warn!("No token secret configured, using a random per-process secret");
                Self::with_random_secret()
            }
        };
        tokens.with_default_ttl(Duration::hours(i64::from(config.token_ttl_hours)))
    }

    /// Token service with a freshly generated secret.
    pub fn with_random_secret() -> Self {
        Self::new(random_secret().as_bytes())
    }

    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            clock,
        }
    }

    /// Override the lifetime used by [`TokenService::issue`].
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` with the default lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` expiring `ttl` from now. A negative `ttl`
    /// yields an already-expired token.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing(format!("token lifetime {} out of range", ttl)))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and return its subject.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    /// Validate a token and return all of its claims.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;

        if self.clock.now().timestamp() > data.claims.exp {
            return Err(TokenError::InvalidToken);
        }

        Ok(data.claims)
    }
}

fn random_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
