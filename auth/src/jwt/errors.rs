use thiserror::Error;

/// Error type for token encoding and decoding.
///
/// Carries the precise decode failure. Callers outside this crate should only
/// ever see the coarser [`crate::token::AuthError`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token declares an unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token issuer is not trusted")]
    IssuerMismatch,

    #[error("Token is expired")]
    Expired,

    #[error("Token is not valid yet")]
    NotYetValid,
}
