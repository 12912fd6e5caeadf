//! Authentication endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::auth::{self, ACCESS_COOKIE};
use crate::error::ApiError;
use crate::provider::{AuthProvider, ProviderError};
use crate::state::AppState;
use crate::store::{FormationStore, Profile, ProfileStore, Role};
use crate::token;

/// Minimum password length, matching the provider's own policy
const MIN_PASSWORD_LENGTH: usize = 6;

/// Sanitized user summary returned by the auth endpoints
#[derive(Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserSummary,
}

/// POST /api/auth/register
///
/// Creates the provider-side account, then best-effort creates the local
/// profile row. Does not log the user in.
pub async fn register<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(ApiError::Validation(
                "Email and password are required.".to_string(),
            ))
        }
    };

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long.".to_string(),
        ));
    }

    let role = match req.role.as_deref() {
        Some(raw) => Role::parse(raw).ok_or_else(|| {
            ApiError::Validation("Invalid role. Must be ADMIN or MEMBER.".to_string())
        })?,
        None => Role::default(),
    };
    let full_name = req.full_name.unwrap_or_default();

    let user = state
        .auth_provider
        .sign_up(email, password, &full_name, role)
        .await
        .map_err(map_auth_provider_err)?;

    // Best-effort: a failed profile insert does not abort registration, the
    // row can be backfilled later.
    let now = Utc::now();
    let profile = Profile {
        id: user.id,
        email: user.email.clone(),
        full_name: full_name.clone(),
        role,
        created_at: now,
        updated_at: now,
    };
    if let Err(e) = state.profiles.insert(profile).await {
        tracing::warn!(user_id = %user.id, error = %e, "profile creation failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully. Please check your email for verification."
                .to_string(),
            user: UserSummary {
                id: user.id,
                email: user.email,
                role,
                full_name,
                created_at: None,
            },
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

/// POST /api/auth/login
///
/// Any provider rejection collapses to a uniform invalid-credentials 401 so
/// the response never reveals whether the account exists.
pub async fn login<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(ApiError::Validation(
                "Email and password are required.".to_string(),
            ))
        }
    };

    let user = state
        .auth_provider
        .sign_in_with_password(email, password)
        .await
        .map_err(|e| match e {
            ProviderError::Rejected(_) => ApiError::InvalidCredentials,
            ProviderError::Timeout => ApiError::Unavailable,
            ProviderError::Transport(detail) => ApiError::Internal(detail),
        })?;

    let profile = match state.profiles.get(user.id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "profile fetch failed");
            None
        }
    };

    // Role resolution cascade: profile row, then provider metadata hint,
    // then the lowest privilege.
    let role = profile
        .as_ref()
        .map(|p| p.role)
        .or(user.role_hint)
        .unwrap_or_default();

    let full_name = profile
        .as_ref()
        .map(|p| p.full_name.clone())
        .or_else(|| user.full_name.clone())
        .unwrap_or_default();

    let token = token::mint(user.id, &user.email, role, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token mint failed: {e}")))?;
    auth::set_access_cookie(&cookies, token.clone(), state.config.production);

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful.".to_string(),
        user: UserSummary {
            id: user.id,
            email: user.email,
            role,
            full_name,
            created_at: None,
        },
        token,
    }))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// POST /api/auth/logout
///
/// Always succeeds: the provider-side sign-out is best-effort and the
/// cookie is cleared regardless.
pub async fn logout<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
) -> Json<MessageResponse>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    if let Err(e) = state.auth_provider.sign_out().await {
        tracing::debug!(error = %e, "provider sign-out failed");
    }

    auth::clear_access_cookie(&cookies, state.config.production);

    Json(MessageResponse {
        success: true,
        message: "Logout successful.".to_string(),
    })
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// POST /api/auth/forgot-password
///
/// Replies with the same generic message whether or not the address has an
/// account; the only 400 path is a provider-level rejection unrelated to
/// account existence (e.g. a malformed address).
pub async fn forgot_password<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let email = match req.email.as_deref() {
        Some(e) if !e.is_empty() => e,
        _ => return Err(ApiError::Validation("Email is required.".to_string())),
    };

    let redirect_to = format!("{}/reset-password", state.config.frontend_url);
    state
        .auth_provider
        .reset_password_for_email(email, &redirect_to)
        .await
        .map_err(map_auth_provider_err)?;

    Ok(Json(MessageResponse {
        success: true,
        message: "If an account with that email exists, a password reset link has been sent."
            .to_string(),
    }))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// POST /api/auth/reset-password
///
/// The recovery session itself is owned by the provider's link flow; we
/// only validate length locally and delegate.
pub async fn reset_password<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let (recovery_token, new_password) = match (req.token.as_deref(), req.new_password.as_deref())
    {
        (Some(t), Some(p)) if !t.is_empty() && !p.is_empty() => (t, p),
        _ => {
            return Err(ApiError::Validation(
                "Token and new password are required.".to_string(),
            ))
        }
    };

    if new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long.".to_string(),
        ));
    }

    state
        .auth_provider
        .update_user_password(recovery_token, new_password)
        .await
        .map_err(map_auth_provider_err)?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Password has been reset successfully.".to_string(),
    }))
}

#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: UserSummary,
}

/// GET /api/auth/me
pub async fn get_current_user<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
) -> Result<Json<CurrentUserResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let claims = auth::authenticate(&cookies, &state.config.jwt_secret)?;

    let profile = state
        .profiles
        .get(claims.sub)
        .await?
        .ok_or(ApiError::NotFound("User not found."))?;

    Ok(Json(CurrentUserResponse {
        success: true,
        user: UserSummary {
            id: profile.id,
            email: profile.email,
            role: profile.role,
            full_name: profile.full_name,
            created_at: Some(profile.created_at),
        },
    }))
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// POST /api/auth/refresh
///
/// Re-mints the cookie token with identical claims and a fresh expiry. The
/// old token is decoded without signature or expiry verification, matching
/// the original system: refresh trusts previously-issued claims rather
/// than re-authenticating. Requiring `token::verify` here instead would be
/// the hardened alternative.
pub async fn refresh<A, P, F>(
    State(state): State<Arc<AppState<A, P, F>>>,
    cookies: Cookies,
) -> Result<Json<RefreshResponse>, ApiError>
where
    A: AuthProvider,
    P: ProfileStore,
    F: FormationStore,
{
    let cookie = cookies.get(ACCESS_COOKIE).ok_or(ApiError::NoTokenToRefresh)?;

    let claims = token::decode_unsafe(cookie.value()).ok_or(ApiError::InvalidToken)?;

    let new_token = token::mint(claims.sub, &claims.email, claims.role, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token mint failed: {e}")))?;
    auth::set_access_cookie(&cookies, new_token.clone(), state.config.production);

    Ok(Json(RefreshResponse {
        success: true,
        message: "Token refreshed successfully.".to_string(),
        token: new_token,
    }))
}

/// Map provider errors for the auth flows where the provider's own message
/// is surfaced as a 400.
fn map_auth_provider_err(e: ProviderError) -> ApiError {
    match e {
        ProviderError::Rejected(message) => ApiError::Provider(message),
        ProviderError::Timeout => ApiError::Unavailable,
        ProviderError::Transport(detail) => ApiError::Internal(detail),
    }
}
