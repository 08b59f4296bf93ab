use thiserror::Error;

use crate::jwt::JwtError;

/// Manager-level token errors.
///
/// Deliberately coarse: decode detail (bad signature, malformed, wrong
/// algorithm) is folded into `InvalidToken`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("invalid token claims")]
    InvalidClaims,

    #[error("failed to issue token: {0}")]
    Issuance(JwtError),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::ExpiredToken,
            JwtError::EncodingFailed(_) => AuthError::Issuance(err),
            JwtError::MalformedToken(_)
            | JwtError::UnexpectedAlgorithm
            | JwtError::SignatureInvalid
            | JwtError::IssuerMismatch
            | JwtError::NotYetValid => AuthError::InvalidToken,
        }
    }
}
