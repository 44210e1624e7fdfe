//! Account routes: register, login, logout and the password-reset flow.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use crate::middleware::SESSION_COOKIE;
use crate::routes::models::{
    CheckOtpRequest, Gym, LoginRequest, RegisterRequest, ResetPasswordRequest, SendOtpRequest,
};
use crate::routes::MessageResponse;
use crate::services::auth as auth_service;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub success: bool,
    pub data: Gym,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub success: bool,
    pub gym: Gym,
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Gym account created", body = RegisterResponse),
        (status = 400, description = "Missing fields or duplicate username/email", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let gym = auth_service::register(state.db_pool(), payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Successfully registered".to_string(),
            success: true,
            data: gym,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let (gym, token) = auth_service::login(state.db_pool(), state.tokens(), payload).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::hours(24));

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            message: "logged in successfully".to_string(),
            success: true,
            gym,
            token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let cookie = Cookie::build(SESSION_COOKIE).path("/");

    (
        jar.remove(cookie),
        Json(MessageResponse::new("logged out successfully")),
    )
}

#[utoipa::path(
    post,
    path = "/auth/reset-password/sendOtp",
    tag = "Auth",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP dispatched by mail", body = MessageResponse),
        (status = 404, description = "No account with that email", body = crate::error::ErrorResponse),
        (status = 500, description = "Mail dispatch failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn send_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth_service::send_reset_code(
        state.db_pool(),
        state.mailer(),
        state.reset_code_ttl(),
        &payload.email,
    )
    .await?;

    Ok(Json(MessageResponse::new("OTP sent successfully")))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password/checkOtp",
    tag = "Auth",
    request_body = CheckOtpRequest,
    responses(
        (status = 200, description = "OTP accepted", body = MessageResponse),
        (status = 400, description = "OTP is invalid or has expired", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_otp(
    State(state): State<AppState>,
    Json(payload): Json<CheckOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth_service::check_reset_code(state.db_pool(), &payload.email, &payload.otp).await?;

    Ok(Json(MessageResponse::new("OTP verified successfully")))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced; reset code cleared", body = MessageResponse),
        (status = 404, description = "No account with that email", body = crate::error::ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    auth_service::reset_password(state.db_pool(), &payload.email, &payload.new_password).await?;

    Ok(Json(MessageResponse::new("Password reset successfully")))
}
