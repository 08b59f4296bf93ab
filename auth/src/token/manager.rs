use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::AuthError;
use crate::jwt::Claims;
use crate::jwt::Subject;
use crate::jwt::TokenCodec;
use crate::jwt::TokenType;

/// Access and refresh tokens issued together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (Unix timestamp)
    pub expires_at: i64,
}

/// Issues, validates and rotates token pairs.
///
/// Stateless: every operation is a function of its inputs and the clock, so
/// a single instance can be shared across threads behind an `Arc`.
///
/// There is no revocation store. A refresh token stays valid until its own
/// expiry even after it has been exchanged for a new pair, and an access
/// token cannot be withdrawn before it expires.
pub struct TokenManager {
    codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenManager {
    /// Create a token manager.
    ///
    /// # Arguments
    /// * `secret` - Signing secret shared by issuance and validation
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            codec: TokenCodec::new(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue an access/refresh pair for a subject.
    ///
    /// # Errors
    /// * `Issuance` - Signing failed
    pub fn issue_pair(&self, subject: &Subject) -> Result<TokenPair, AuthError> {
        self.issue_pair_at(subject, Utc::now())
    }

    /// Issue a pair as if the current time were `now`.
    pub fn issue_pair_at(
        &self,
        subject: &Subject,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access = Claims::new(subject, TokenType::Access, now, self.access_ttl)?;
        let refresh = Claims::new(subject, TokenType::Refresh, now, self.refresh_ttl)?;

        let access_token = self.codec.encode(&access)?;
        let refresh_token = self.codec.encode(&refresh)?;

        tracing::debug!(user_id = %subject.id, expires_at = access.exp, "Token pair issued");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_at: access.exp,
        })
    }

    /// Validate a token end to end and require a given token type.
    ///
    /// # Errors
    /// * `ExpiredToken` - Token is past its expiry
    /// * `InvalidToken` - Any other decode failure, or the wrong token type
    /// * `InvalidClaims` - Signed claims break the timestamp/subject invariants
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        self.validate_at(token, expected, Utc::now().timestamp())
    }

    /// Validate as of `now` (Unix timestamp).
    pub fn validate_at(
        &self,
        token: &str,
        expected: TokenType,
        now: i64,
    ) -> Result<Claims, AuthError> {
        let claims = self.codec.decode_at(token, now).map_err(|e| {
            tracing::debug!(reason = %e, expected = %expected, "Token rejected");
            AuthError::from(e)
        })?;

        if claims.token_type != expected {
            tracing::debug!(
                user_id = %claims.user_id,
                expected = %expected,
                actual = %claims.token_type,
                "Token type mismatch"
            );
            return Err(AuthError::InvalidToken);
        }

        if !claims.is_consistent() {
            tracing::warn!(user_id = %claims.user_id, "Signed token carries inconsistent claims");
            return Err(AuthError::InvalidClaims);
        }

        Ok(claims)
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The subject is rebuilt from the token alone, so this works while the
    /// user store is unreachable.
    ///
    /// # Errors
    /// * `ExpiredToken` - Refresh token is past its expiry
    /// * `InvalidToken` - Not a valid refresh token (including access tokens)
    /// * `InvalidClaims` - Signed claims break the timestamp/subject invariants
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.refresh_at(refresh_token, Utc::now())
    }

    /// Refresh as if the current time were `now`.
    pub fn refresh_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let claims = self.validate_at(refresh_token, TokenType::Refresh, now.timestamp())?;
        self.issue_pair_at(&claims.subject(), now)
    }
}
