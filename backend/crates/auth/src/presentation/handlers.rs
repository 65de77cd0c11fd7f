//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use kernel::response::Envelope;
use platform::token::AccessTokenCodec;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, LoginInput, LoginUseCase, LogoutUseCase,
    ProfileUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::{ProfileReadRepository, RefreshTokenRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, ProfileResponse, ProfileUserDto, RefreshRequest,
    RefreshResponse, RegisterRequest, SessionResponse, UserDto,
};
use crate::presentation::middleware::authenticate;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub codec: Arc<AccessTokenCodec>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
        state.codec.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;

    let body = SessionResponse {
        user: UserDto::from(&output.user),
        access_token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
    };

    Ok((
        StatusCode::CREATED,
        Envelope::ok(body).with_message("Account created successfully"),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
        state.codec.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let body = SessionResponse {
        user: UserDto::from(&output.user),
        access_token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
    };

    Ok(Envelope::ok(body).with_message("Login successful"))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    let user = authenticate(state.repo.as_ref(), &state.codec, &headers).await?;

    let use_case = ProfileUseCase::new(state.repo.clone());
    let output = use_case.execute(&user).await?;

    let body = ProfileResponse {
        user: ProfileUserDto {
            id: user.user_id.get(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            created_at: user.created_at,
        },
        enrollments: output.enrollments.into_iter().map(Into::into).collect(),
        progress: output.progress.into(),
    };

    Ok(Envelope::ok(body))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
        state.codec.clone(),
    );

    let output = use_case.execute(&req.refresh_token).await?;

    Ok(Envelope::ok(RefreshResponse {
        access_token: output.access_token,
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    let user = authenticate(state.repo.as_ref(), &state.codec, &headers).await?;

    let use_case = LogoutUseCase::new(state.repo.clone());
    use_case.execute(user.user_id).await?;

    Ok(Envelope::ack("Logged out successfully"))
}

// ============================================================================
// Change Password
// ============================================================================

/// PUT /api/auth/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + ProfileReadRepository + Clone + Send + Sync + 'static,
{
    let user = authenticate(state.repo.as_ref(), &state.codec, &headers).await?;

    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.repo.clone());
    use_case
        .execute(
            &user,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Envelope::ack(
        "Password changed successfully. Please log in again.",
    ))
}
