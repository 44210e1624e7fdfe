use axum::http::StatusCode;
use maxxzone_auth::AuthError;

use crate::ApiError;

/// Error kinds returned by the service layer. The HTTP mapping lives in the
/// `From<ServiceError> for ApiError` impl and nowhere else.
#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Validation(String),
    Conflict(String),
    Database(sqlx::Error),
    Auth(AuthError),
    Mail(String),
    Internal(String),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        Self::Mail(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Validation(msg) => ApiError::bad_request(msg),
            ServiceError::Conflict(msg) => ApiError::bad_request(msg),
            ServiceError::Database(db_err) => {
                tracing::error!(error = %db_err, "database error");
                ApiError::internal_server_error("server error")
            }
            ServiceError::Auth(auth_err) => {
                let status = match auth_err {
                    AuthError::InvalidCredentials
                    | AuthError::TokenExpired
                    | AuthError::InvalidSignature
                    | AuthError::MalformedToken => StatusCode::UNAUTHORIZED,
                    AuthError::SecretMissing
                    | AuthError::TokenCreation
                    | AuthError::PasswordHash => {
                        tracing::error!(error = %auth_err, "auth subsystem error");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    "server configuration error".to_string()
                } else {
                    auth_err.to_string()
                };
                ApiError::new(status, message)
            }
            ServiceError::Mail(msg) => {
                tracing::error!(error = %msg, "mail error");
                ApiError::internal_server_error("failed to send OTP email")
            }
            ServiceError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                ApiError::internal_server_error("server error")
            }
        }
    }
}
