use chrono::Duration;
use chrono::Utc;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Session token claims.
///
/// The wire names (`user_id`, `exp`, `iat`) are part of the token format and
/// must not change without invalidating every outstanding token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated user identifier
    #[serde(deserialize_with = "integral_user_id")]
    pub user_id: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Issued at (Unix timestamp, seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Create claims for a user that expire `ttl` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `ttl` - Token lifetime (negative values produce an already expired token)
    ///
    /// # Returns
    /// Claims with user_id, exp, and iat set
    pub fn for_user(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
        }
    }
}

/// Accepts `user_id` as a JSON integer, or as a float with no fractional part
/// that fits in an i64. Anything else (strings, fractions, out of range) fails.
fn integral_user_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;

    if let Some(id) = number.as_i64() {
        return Ok(id);
    }

    match number.as_f64() {
        Some(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(de::Error::custom(format!(
            "user_id is not an integer: {}",
            number
        ))),
    }
}
