use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordError;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Password hashing and verification run on Tokio's blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    /// `Ok(false)` on mismatch; errors only for unusable hashes.
    async fn verify_password(&self, password: String, hash: String) -> Result<bool, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        let outcome =
            tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &hash))
                .await
                .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;

        match outcome {
            Ok(()) => Ok(true),
            Err(PasswordError::Mismatch) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, "Stored password hash is unusable");
                Err(e.into())
            }
        }
    }

    /// Spends one verification on an unknown email so its timing matches a
    /// wrong password.
    async fn verify_decoy(&self, password: String) -> Result<(), UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.verify_decoy(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;
        Ok(())
    }

    fn check_policy(&self, password: &str) -> Result<(), UserError> {
        if self.authenticator.meets_policy(password) {
            Ok(())
        } else {
            Err(UserError::WeakPassword {
                min: auth::password::MIN_PASSWORD_LENGTH,
            })
        }
    }

    async fn active_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    fn open_session(&self, user: User) -> Result<Session, UserError> {
        let tokens = self.authenticator.issue_tokens(&user.subject())?;
        Ok(Session { user, tokens })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, UserError> {
        self.check_policy(&command.password)?;

        let password_hash = self.hash_password(command.password).await?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
            phone: command.phone,
            date_of_birth: command.date_of_birth,
            address: command.address,
            is_active: true,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        self.open_session(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<Session, UserError> {
        let email = EmailAddress::normalize(&command.email);
        let Some(user) = self.repository.find_by_email(&email).await? else {
            self.verify_decoy(command.password).await?;
            tracing::debug!("Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        let matches = self
            .verify_password(command.password, user.password_hash.clone())
            .await?;
        if !matches {
            tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "Login rejected: account deactivated");
            return Err(UserError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.open_session(user)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, UserError> {
        self.authenticator
            .refresh_tokens(refresh_token)
            .map_err(UserError::from)
    }

    async fn get_profile(&self, id: &UserId) -> Result<User, UserError> {
        self.active_user(id).await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self.active_user(id).await?;

        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = command.phone {
            user.phone = Some(phone);
        }
        if let Some(date_of_birth) = command.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(address) = command.address {
            user.address = Some(address);
        }
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self.active_user(id).await?;

        if !self
            .verify_password(command.current_password, user.password_hash)
            .await?
        {
            return Err(UserError::IncorrectPassword);
        }

        self.check_policy(&command.new_password)?;

        let password_hash = self.hash_password(command.new_password).await?;
        self.repository.update_password(id, &password_hash).await?;

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    async fn deactivate(&self, id: &UserId) -> Result<(), UserError> {
        self.active_user(id).await?;
        self.repository.deactivate(id).await?;

        tracing::info!(user_id = %id, "User deactivated");
        Ok(())
    }
}
