//! Authentication middleware for tenant-scoped routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use maxxzone_auth::AuthError;

use crate::routes::models::Gym;
use crate::{ApiError, AppState};

/// Name of the HTTP-only session cookie set on login.
pub const SESSION_COOKIE: &str = "cookie_token";

/// The authenticated gym account, attached to request extensions by
/// [`require_gym`]. The password hash is excluded at the query level.
#[derive(Debug, Clone)]
pub struct CurrentGym(pub Gym);

/// Validate the session token and resolve the owning gym.
///
/// Token lookup order: session cookie first, then a bearer authorization
/// header. A missing token is rejected before any database access. Expired
/// tokens, tampered tokens, and unexpected failures each map to distinct
/// outcomes; only the last is a 500.
pub async fn require_gym(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let token = cookie_token.or_else(|| bearer_token(request.headers()));

    let Some(token) = token else {
        return Err(ApiError::unauthorized("no token, authorization denied"));
    };

    let gym_id = state.tokens().verify(&token).map_err(|err| match err {
        AuthError::TokenExpired => ApiError::unauthorized("session has expired"),
        AuthError::InvalidSignature | AuthError::MalformedToken => {
            ApiError::unauthorized("token is not valid")
        }
        other => {
            tracing::error!(error = %other, "session verification failed");
            ApiError::internal_server_error("server configuration error")
        }
    })?;

    let gym = sqlx::query_as::<_, Gym>(
        "SELECT id, user_name, gym_name, email, profile_pic, created_at, updated_at \
         FROM gyms WHERE id = ?",
    )
    .bind(gym_id)
    .fetch_optional(state.db_pool())
    .await
    .map_err(|err| {
        tracing::error!(error = %err, "failed to resolve gym for session");
        ApiError::internal_server_error("database error")
    })?
    .ok_or_else(|| ApiError::unauthorized("gym not found"))?;

    request.extensions_mut().insert(CurrentGym(gym));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    parts.next().filter(|token| !token.is_empty()).map(str::to_string)
}
