pub mod login;
pub mod register;

pub use login::login;
pub use register::register;

use serde::Serialize;

/// Payload returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub token: String,
}
