use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::{
    dto::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RecoveryConfirmRequest,
        RecoveryIssued, RecoveryRequest, RefreshRequest, RegisterRequest,
    },
    extractors::AuthUser,
    jwt::JwtKeys,
    password::{
        check_password_rules, hash_password, is_valid_email, verify_password, MIN_DOCUMENT_LEN,
    },
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{NewUser, PublicUser, User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/password", post(change_password))
        .route("/auth/recovery", post(request_recovery))
        .route("/auth/recovery/confirm", post(confirm_recovery))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::bad_request("Invalid email"));
    }
    Ok(email)
}

fn issue(keys: &JwtKeys, user: &User) -> AppResult<AuthResponse> {
    let pair = keys.sign_pair(user.id)?;
    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.to_public(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = normalize_email(&payload.email)?;
    let name = payload.name.trim().to_string();
    let last_name = payload.last_name.trim().to_string();
    let document_number = payload.document_number.trim().to_string();

    if name.is_empty() || last_name.is_empty() {
        return Err(AppError::bad_request("Name and last name are required"));
    }
    if document_number.chars().count() < MIN_DOCUMENT_LEN {
        return Err(AppError::bad_request(format!(
            "Document number must be at least {MIN_DOCUMENT_LEN} characters"
        )));
    }
    check_password_rules(&payload.password)?;

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .users
        .register(NewUser {
            name,
            last_name,
            document_type: payload.document_type,
            document_number,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(issue(&state.jwt, &user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&payload.email)?;
    let Some(user) = state.users.validate_login(&email, &payload.password).await? else {
        warn!(%email, "login rejected");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(issue(&state.jwt, &user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let claims = state.jwt.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;
    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(issue(&state.jwt, &user)?))
}

/// Current user, read fresh so verification changes show up immediately.
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(user.to_public()))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = state.users.get(user_id).await?;
    if !verify_password(&payload.current_password, &user.password_hash)? {
        warn!(%user_id, "change password: wrong current password");
        return Err(AppError::Unauthorized("Current password is incorrect".into()));
    }
    check_password_rules(&payload.new_password)?;
    let hash = hash_password(&payload.new_password)?;
    state.users.set_password_hash(user_id, hash).await?;
    info!(%user_id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn request_recovery(
    State(state): State<AppState>,
    Json(payload): Json<RecoveryRequest>,
) -> AppResult<(StatusCode, Json<RecoveryIssued>)> {
    let email = normalize_email(&payload.email)?;
    if !state.users.email_exists(&email).await? {
        return Err(AppError::not_found("No account registered with this email"));
    }
    let code = state.recovery.issue(&email, OffsetDateTime::now_utc()).await?;
    let ttl = state.recovery.ttl_minutes();
    state.notifier.recovery_code(&email, &code, ttl).await?;
    info!(%email, "recovery code issued");
    Ok((
        StatusCode::ACCEPTED,
        Json(RecoveryIssued {
            expires_in_minutes: ttl,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn confirm_recovery(
    State(state): State<AppState>,
    Json(payload): Json<RecoveryConfirmRequest>,
) -> AppResult<StatusCode> {
    let email = normalize_email(&payload.email)?;
    check_password_rules(&payload.new_password)?;
    state
        .recovery
        .consume(&email, payload.code.trim(), OffsetDateTime::now_utc())
        .await?;
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found("No account registered with this email"))?;
    let hash = hash_password(&payload.new_password)?;
    state.users.set_password_hash(user.id, hash).await?;
    info!(user_id = %user.id, "password reset via recovery code");
    Ok(StatusCode::NO_CONTENT)
}
