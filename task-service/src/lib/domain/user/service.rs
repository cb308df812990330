use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for account operations.
///
/// Password hashing and verification are CPU bound, so both run on the
/// blocking thread pool.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Shared password hasher and token issuer
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
            .map_err(|e| UserError::PasswordHashing(e.to_string()))?
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<bool, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, stored_hash.as_deref())
        })
        .await
        .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    #[tracing::instrument(skip_all, fields(username = %command.username))]
    async fn register(&self, command: RegisterCommand) -> Result<UserId, UserError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            tracing::warn!("Registration rejected: username taken");
            return Err(UserError::UserExists(command.username.to_string()));
        }

        let password_hash = self
            .hash_password(command.password.into_inner())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Password hashing failed"))?;

        // The store re-checks uniqueness, covering a concurrent registration
        // that slipped in after the lookup above.
        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user.id)
    }

    #[tracing::instrument(skip_all, fields(username = %command.username))]
    async fn login(&self, command: LoginCommand) -> Result<UserId, UserError> {
        let user = self.repository.find_by_username(&command.username).await?;
        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());

        let verified = self.verify_password(command.password, stored_hash).await?;

        match user {
            Some(user) if verified => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(user.id)
            }
            _ => {
                tracing::warn!("Login rejected");
                Err(UserError::InvalidLogin)
            }
        }
    }
}
