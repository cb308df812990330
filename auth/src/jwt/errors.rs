use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification failures are deliberately collapsed into `InvalidToken`:
/// callers cannot tell an expired token from a forged or malformed one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}
