//! Auth handlers: login, logout, password change, forgot/reset password.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;

use roster_core::config::AppConfig;
use roster_core::error::AppError;
use roster_service::LoginResult;

use crate::dto::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    TokenStatusRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// `Set-Cookie` value carrying the access token; `max_age_secs == 0` clears it.
fn session_cookie(
    config: &AppConfig,
    token: &str,
    max_age_secs: u64,
) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        config.auth.cookie_name, token, max_age_secs
    );
    if config.environment.is_production() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid session cookie: {e}")))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result: LoginResult = state.auth_service.login(&req.email, &req.password).await?;
    let cookie = session_cookie(
        &state.config,
        &result.access_token,
        result.expires_in_ms / 1000,
    )?;

    Ok(([(header::SET_COOKIE, cookie)], Json(ApiResponse::ok(result))))
}

/// GET /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state.auth_service.logout(auth.context()).await?;
    let cookie = session_cookie(&state.config, "", 0)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok(MessageResponse::new("Logged out successfully"))),
    ))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let message = state
        .auth_service
        .change_password(auth.context(), &req.current_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(message))))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.auth_service.forgot_password(&req.email).await?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "If the email exists, a password reset link has been sent",
    ))))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .auth_service
        .reset_password(&req.token, &req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/reset-password/token-status
pub async fn token_status(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TokenStatusRequest>,
) -> Result<StatusCode, ApiError> {
    state.auth_service.validate_reset_token(&req.token).await?;
    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::config::Environment;

    #[test]
    fn test_session_cookie_flags() {
        let mut config = AppConfig::default();
        let cookie = session_cookie(&config, "abc", 900).unwrap();
        assert_eq!(
            cookie,
            "access_token=abc; HttpOnly; Path=/; SameSite=Lax; Max-Age=900"
        );

        config.environment = Environment::Production;
        let cleared = session_cookie(&config, "", 0).unwrap();
        assert!(cleared.to_str().unwrap().starts_with("access_token=; "));
        assert!(cleared.to_str().unwrap().ends_with("; Secure"));
    }
}
