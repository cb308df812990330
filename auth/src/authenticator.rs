use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::HashingCost;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and session tokens.
///
/// One instance is built at startup and shared read-only between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    decoy_hash: String,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued session tokens
    /// * `cost` - Argon2id cost parameters for password hashing
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `InvalidParams` - Cost parameters rejected by Argon2
    /// * `HashingFailed` - Decoy hash could not be computed
    pub fn new(
        jwt_secret: &[u8],
        token_ttl: Duration,
        cost: HashingCost,
    ) -> Result<Self, PasswordError> {
        let password_hasher = PasswordHasher::with_cost(cost)?;
        let decoy_hash = password_hasher.hash("decoy-password-never-matches")?;

        Ok(Self {
            password_hasher,
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash.
    ///
    /// Pass `None` when no account was found: the password is then checked
    /// against an internal decoy hash, so an unknown account costs the same
    /// time as a wrong password. The result is always false in that case.
    pub fn verify_password(&self, password: &str, stored_hash: Option<&str>) -> bool {
        match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => {
                let _ = self.password_hasher.verify(password, &self.decoy_hash);
                false
            }
        }
    }

    /// Issue a session token for a user with the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(&self, user_id: i64) -> Result<String, JwtError> {
        self.jwt_handler.issue(user_id, self.token_ttl)
    }

    /// Validate a session token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is expired, forged or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }

    /// Lifetime of tokens issued by this authenticator.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}
