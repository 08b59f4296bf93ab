use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create a new account and sign it in.
    ///
    /// # Arguments
    /// * `command` - Validated command with email, password and profile fields
    ///
    /// # Returns
    /// Created user with a fresh token pair
    ///
    /// # Errors
    /// * `WeakPassword` - Password fails the minimum-length policy
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Session, UserError>;

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password or deactivated account
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<Session, UserError>;

    /// Exchange a refresh token for a new pair. Never touches the store.
    ///
    /// # Errors
    /// * `Token` - Refresh token rejected
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, UserError>;

    /// Retrieve an active user's profile.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is deactivated
    /// * `DatabaseError` - Database operation failed
    async fn get_profile(&self, id: &UserId) -> Result<User, UserError>;

    /// Update profile fields of an active user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is deactivated
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Replace the stored password hash after re-verifying the current password.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is deactivated
    /// * `IncorrectPassword` - Current password does not match
    /// * `WeakPassword` - New password fails the policy
    /// * `DatabaseError` - Database operation failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// Soft-deactivate an account.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is already deactivated
    /// * `DatabaseError` - Database operation failed
    async fn deactivate(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier, active or not.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address, active or not.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Overwrite profile fields and `updated_at`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Replace the password hash.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), UserError>;

    /// Mark the user inactive; the row is kept.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn deactivate(&self, id: &UserId) -> Result<(), UserError>;
}
