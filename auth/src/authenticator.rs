use std::sync::Arc;

use crate::jwt::Subject;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::AuthError;
use crate::token::TokenManager;
use crate::token::TokenPair;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    tokens: Arc<TokenManager>,
    /// Hash of a throwaway secret at the configured cost. Verified against
    /// when a login names no known account.
    decoy_hash: String,
}

const DECOY_SECRET: &str = "decoy-secret-never-assigned-to-an-account";

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] AuthError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher configured with the deployment's cost
    /// * `tokens` - Token manager shared with the authentication gate
    ///
    /// # Errors
    /// * `HashingFailed` - The decoy hash could not be computed
    pub fn new(
        password_hasher: PasswordHasher,
        tokens: Arc<TokenManager>,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = password_hasher.hash(DECOY_SECRET)?;

        Ok(Self {
            password_hasher,
            tokens,
            decoy_hash,
        })
    }

    /// Token manager backing this authenticator.
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Hash a password for storage.
    ///
    /// CPU-bound and deliberately slow; async callers should run it on a
    /// blocking thread.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match
    /// * `InvalidHash` - Stored hash is unreadable
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<(), PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Spend one full verification on a login attempt that matched no account.
    ///
    /// Costs the same as [`Authenticator::verify_password`] against a real
    /// hash and always yields `Mismatch`, so unknown and known emails take the
    /// same time to reject.
    pub fn verify_decoy(&self, password: &str) -> PasswordError {
        if let Err(e @ PasswordError::InvalidHash(_)) =
            self.password_hasher.verify(password, &self.decoy_hash)
        {
            tracing::error!(error = %e, "Decoy hash is unusable");
        }
        PasswordError::Mismatch
    }

    /// Minimum-length pre-check for new passwords.
    pub fn meets_policy(&self, password: &str) -> bool {
        self.password_hasher.meets_policy(password)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Principal the tokens are issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be used
    /// * `TokenError` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &Subject,
    ) -> Result<TokenPair, AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => return Err(AuthenticationError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        }

        Ok(self.tokens.issue_pair(subject)?)
    }

    /// Issue a token pair without password verification.
    ///
    /// Used right after registration, when the credentials were just set.
    pub fn issue_tokens(&self, subject: &Subject) -> Result<TokenPair, AuthError> {
        self.tokens.issue_pair(subject)
    }

    /// Exchange a refresh token for a new pair.
    pub fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.tokens.refresh(refresh_token)
    }
}
