//! Account lifecycle: registration, login, logout, password reset.

use chrono::Utc;
use maxxzone_auth::{generate_reset_code, hash_password, verify_password, AuthError, SessionTokens};
use sqlx::SqlitePool;

use super::error::ServiceError;
use crate::mailer::Mailer;
use crate::routes::models::{Gym, LoginRequest, RegisterRequest};

pub async fn register(pool: &SqlitePool, req: RegisterRequest) -> Result<Gym, ServiceError> {
    let user_name = req.user_name.trim();
    let gym_name = req.gym_name.trim();
    let email = req.email.trim();

    if user_name.is_empty() || req.password.is_empty() || gym_name.is_empty() || email.is_empty() {
        return Err(ServiceError::validation(
            "all fields (userName, password, gymName, email) are required",
        ));
    }

    let existing =
        sqlx::query_scalar::<_, i64>("SELECT id FROM gyms WHERE user_name = ? OR email = ?")
            .bind(user_name)
            .bind(email)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Err(ServiceError::conflict("username or email already exists"));
    }

    let password_hash = hash_password(&req.password)?;
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO gyms (user_name, email, password_hash, gym_name, profile_pic, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_name)
    .bind(email)
    .bind(&password_hash)
    .bind(gym_name)
    .bind(&req.profile_pic)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    fetch_gym(pool, result.last_insert_rowid()).await
}

/// Authenticate and issue a session token.
///
/// Unknown usernames and wrong passwords produce the identical error so the
/// response does not reveal which accounts exist.
pub async fn login(
    pool: &SqlitePool,
    tokens: &SessionTokens,
    req: LoginRequest,
) -> Result<(Gym, String), ServiceError> {
    let credentials = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, password_hash FROM gyms WHERE user_name = ?",
    )
    .bind(req.user_name.trim())
    .fetch_optional(pool)
    .await?;

    let Some((gym_id, password_hash)) = credentials else {
        return Err(ServiceError::Auth(AuthError::InvalidCredentials));
    };

    if !verify_password(&req.password, &password_hash)? {
        return Err(ServiceError::Auth(AuthError::InvalidCredentials));
    }

    let token = tokens.issue(gym_id)?;
    let gym = fetch_gym(pool, gym_id).await?;

    tracing::info!(gym = %gym.user_name, "gym logged in");
    Ok((gym, token))
}

/// Persist a fresh reset code and dispatch it by mail.
///
/// The code is stored before the mail is attempted; a dispatch failure is
/// reported as a server error but the code stays valid (no rollback).
pub async fn send_reset_code(
    pool: &SqlitePool,
    mailer: Option<&Mailer>,
    ttl: chrono::Duration,
    email: &str,
) -> Result<(), ServiceError> {
    let Some(mailer) = mailer else {
        return Err(ServiceError::mail("email service not configured"));
    };

    let email = email.trim();
    let gym_id = sqlx::query_scalar::<_, i64>("SELECT id FROM gyms WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("email not found"))?;

    let code = generate_reset_code();
    let expires_at = (Utc::now() + ttl).to_rfc3339();

    sqlx::query(
        "UPDATE gyms SET reset_code = ?, reset_code_expires_at = ?, updated_at = ? WHERE id = ?",
    )
    .bind(i64::from(code))
    .bind(&expires_at)
    .bind(Utc::now().to_rfc3339())
    .bind(gym_id)
    .execute(pool)
    .await?;

    mailer.send_reset_code(email, code).await?;

    tracing::info!(gym_id, "password reset code dispatched");
    Ok(())
}

/// Accept the code only when it matches exactly and is strictly before its
/// stored expiry.
pub async fn check_reset_code(
    pool: &SqlitePool,
    email: &str,
    otp: &str,
) -> Result<(), ServiceError> {
    const INVALID: &str = "OTP is invalid or has expired";

    let Ok(code) = otp.trim().parse::<i64>() else {
        return Err(ServiceError::validation(INVALID));
    };

    let row = sqlx::query_as::<_, (Option<i64>, Option<String>)>(
        "SELECT reset_code, reset_code_expires_at FROM gyms WHERE email = ?",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    let Some((Some(stored_code), Some(expires_at))) = row else {
        return Err(ServiceError::validation(INVALID));
    };

    if stored_code != code {
        return Err(ServiceError::validation(INVALID));
    }

    let expires_at = chrono::DateTime::parse_from_rfc3339(&expires_at)
        .map_err(|_| ServiceError::validation(INVALID))?;

    if Utc::now() >= expires_at {
        return Err(ServiceError::validation(INVALID));
    }

    Ok(())
}

pub async fn reset_password(
    pool: &SqlitePool,
    email: &str,
    new_password: &str,
) -> Result<(), ServiceError> {
    if new_password.is_empty() {
        return Err(ServiceError::validation("new password is required"));
    }

    let gym_id = sqlx::query_scalar::<_, i64>("SELECT id FROM gyms WHERE email = ?")
        .bind(email.trim())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("user not found"))?;

    let password_hash = hash_password(new_password)?;

    sqlx::query(
        "UPDATE gyms SET password_hash = ?, reset_code = NULL, reset_code_expires_at = NULL, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&password_hash)
    .bind(Utc::now().to_rfc3339())
    .bind(gym_id)
    .execute(pool)
    .await?;

    tracing::info!(gym_id, "password reset completed");
    Ok(())
}

pub(crate) async fn fetch_gym(pool: &SqlitePool, gym_id: i64) -> Result<Gym, ServiceError> {
    sqlx::query_as::<_, Gym>(
        "SELECT id, user_name, gym_name, email, profile_pic, created_at, updated_at \
         FROM gyms WHERE id = ?",
    )
    .bind(gym_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::internal("gym row vanished after lookup"))
}
