//! Token lifecycle and credential verification
//!
//! - Password hashing (Argon2id, tunable cost) and the minimum-length policy
//! - Compact HS256 token codec with a pinned algorithm
//! - Access/refresh token pairs: issuance, validation, rotation
//! - Bearer-token gate for request boundaries
//!
//! Everything here is stateless and free of I/O. Secrets are passed in at
//! construction; nothing is read from the environment.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! assert!(hasher.meets_policy("my_password"));
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{Subject, TokenManager, TokenType};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let tokens = TokenManager::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(24),
//!     Duration::hours(168),
//! );
//! let subject = Subject::new(Uuid::new_v4(), "alice@example.com");
//!
//! let pair = tokens.issue_pair(&subject).unwrap();
//! let claims = tokens.validate(&pair.access_token, TokenType::Access).unwrap();
//! assert_eq!(claims.user_id, subject.id);
//!
//! let rotated = tokens.refresh(&pair.refresh_token).unwrap();
//! assert!(tokens.validate(&rotated.access_token, TokenType::Access).is_ok());
//! ```
//!
//! ## Request Gate
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthenticationGate, GateError, TokenManager};
//! use chrono::Duration;
//!
//! let tokens = Arc::new(TokenManager::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(24),
//!     Duration::hours(168),
//! ));
//! let gate = AuthenticationGate::new(tokens);
//!
//! assert_eq!(
//!     gate.authenticate(Some("Basic dXNlcjpwYXNz")),
//!     Err(GateError::MissingCredentials)
//! );
//! ```

pub mod authenticator;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use gate::AuthenticatedSubject;
pub use gate::AuthenticationGate;
pub use gate::GateError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::Subject;
pub use jwt::TokenCodec;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AuthError;
pub use token::TokenManager;
pub use token::TokenPair;
