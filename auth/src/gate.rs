use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::jwt::TokenType;
use crate::token::AuthError;
use crate::token::TokenManager;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubject {
    pub user_id: Uuid,
    pub email: String,
}

/// Request-boundary rejection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("missing bearer credentials")]
    MissingCredentials,

    #[error(transparent)]
    Rejected(#[from] AuthError),
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Any other scheme is rejected, not stripped.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, GateError> {
    header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(GateError::MissingCredentials)
}

/// Access-token check run before protected handlers.
///
/// Pure CPU work: the token carries everything needed, the user store is
/// never consulted.
#[derive(Clone)]
pub struct AuthenticationGate {
    tokens: Arc<TokenManager>,
}

impl AuthenticationGate {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self { tokens }
    }

    /// Resolve the subject behind an `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingCredentials` - Header absent, wrong scheme or empty token
    /// * `Rejected` - Token manager refused the token (propagated unchanged)
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedSubject, GateError> {
        let token = extract_bearer(header)?;
        let claims = self.tokens.validate(token, TokenType::Access)?;

        Ok(AuthenticatedSubject {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
