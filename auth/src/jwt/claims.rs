use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::jwt::errors::JwtError;

/// Issuer stamped into every token and required on decode.
pub const ISSUER: &str = "identity-service";

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Principal a token pair is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: Uuid,
    /// Carried for audit/display only, never for authorization.
    pub email: String,
}

impl Subject {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Signed token payload.
///
/// Registered claims use their RFC 7519 names; `sub` duplicates `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub token_type: TokenType,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Subject (stringified `user_id`)
    pub sub: String,
}

impl Claims {
    /// Build claims for a subject, valid from `issued_at` for `lifetime`.
    ///
    /// # Arguments
    /// * `subject` - Principal the token is for
    /// * `token_type` - Access or refresh
    /// * `issued_at` - Issuance instant (also used as not-before)
    /// * `lifetime` - Time until expiry
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry falls outside the representable time range
    pub fn new(
        subject: &Subject,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        let iat = issued_at.timestamp();
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or_else(|| JwtError::EncodingFailed("token lifetime out of range".to_string()))?;

        Ok(Self {
            user_id: subject.id,
            email: subject.email.clone(),
            token_type,
            iat,
            nbf: iat,
            exp: expires_at.timestamp(),
            iss: ISSUER.to_string(),
            sub: subject.id.to_string(),
        })
    }

    /// Minimal subject record carried by the token.
    pub fn subject(&self) -> Subject {
        Subject::new(self.user_id, self.email.clone())
    }

    /// The expiry instant itself counts as expired.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }

    pub fn is_not_yet_valid(&self, now: i64) -> bool {
        now < self.nbf
    }

    /// `nbf <= iat < exp` and `sub` matches `user_id`.
    pub fn is_consistent(&self) -> bool {
        self.nbf <= self.iat && self.iat < self.exp && self.sub == self.user_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject::new(Uuid::new_v4(), "alice@example.com")
    }

    #[test]
    fn test_new_claims() {
        let subject = subject();
        let now = Utc::now();
        let claims =
            Claims::new(&subject, TokenType::Access, now, Duration::hours(24)).unwrap();

        assert_eq!(claims.user_id, subject.id);
        assert_eq!(claims.sub, subject.id.to_string());
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert!(claims.is_consistent());
    }

    #[test]
    fn test_serialized_field_names() {
        let claims =
            Claims::new(&subject(), TokenType::Refresh, Utc::now(), Duration::hours(1)).unwrap();
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["token_type"], "refresh");
        for key in ["user_id", "email", "iat", "nbf", "exp", "iss", "sub"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_is_expired() {
        let mut claims =
            Claims::new(&subject(), TokenType::Access, Utc::now(), Duration::hours(1)).unwrap();
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_not_yet_valid() {
        let mut claims =
            Claims::new(&subject(), TokenType::Access, Utc::now(), Duration::hours(1)).unwrap();
        claims.nbf = 1000;

        assert!(claims.is_not_yet_valid(999));
        assert!(!claims.is_not_yet_valid(1000));
    }

    #[test]
    fn test_inconsistent_claims() {
        let base =
            Claims::new(&subject(), TokenType::Access, Utc::now(), Duration::hours(1)).unwrap();

        let mut zero_lifetime = base.clone();
        zero_lifetime.exp = zero_lifetime.iat;
        assert!(!zero_lifetime.is_consistent());

        let mut late_nbf = base.clone();
        late_nbf.nbf = late_nbf.iat + 1;
        assert!(!late_nbf.is_consistent());

        let mut foreign_sub = base;
        foreign_sub.sub = Uuid::new_v4().to_string();
        assert!(!foreign_sub.is_consistent());
    }

    #[test]
    fn test_lifetime_overflow_is_an_error() {
        let result = Claims::new(
            &subject(),
            TokenType::Refresh,
            Utc::now(),
            Duration::milliseconds(i64::MAX),
        );

        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_subject_round_trip() {
        let subject = subject();
        let claims =
            Claims::new(&subject, TokenType::Refresh, Utc::now(), Duration::hours(1)).unwrap();

        assert_eq!(claims.subject(), subject);
    }
}
