//! Authentication utilities library
//!
//! Provides the credential and session-token primitives for the task service:
//! - Password hashing (Argon2id, configurable cost, constant-time verify)
//! - Session token issue and verification (HS256 JWT carrying `user_id` and `exp`)
//! - Authentication coordination
//!
//! Tokens are stateless. There is no revocation list, so a leaked token stays
//! valid until it expires; keep the configured lifetime short.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue(42, Duration::hours(1)).unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashingCost};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::hours(1),
//!     HashingCost::default(),
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! assert!(auth.verify_password("password123", Some(&hash)));
//! let token = auth.issue_token(1).unwrap();
//!
//! // Every protected request: validate token
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.user_id, 1);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
