//! Session tokens and credential handling for gym accounts.

mod password;
mod reset;
mod token;

pub use password::{hash_password, verify_password};
pub use reset::{generate_reset_code, RESET_CODE_MAX, RESET_CODE_MIN};
pub use token::{Claims, SessionTokens};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token signing secret is not configured")]
    SecretMissing,
    #[error("failed to sign session token")]
    TokenCreation,
    #[error("session token has expired")]
    TokenExpired,
    #[error("session token signature is invalid")]
    InvalidSignature,
    #[error("malformed session token")]
    MalformedToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed")]
    PasswordHash,
}
