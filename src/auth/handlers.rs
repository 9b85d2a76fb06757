use anyhow::Context;
use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use time::{macros::format_description, OffsetDateTime};
use tracing::{error, info, instrument, warn};

use crate::auth::dto::{
    LoginRequest, ProfileResponse, RefreshTokenRequest, RegisterRequest, TokenResponse,
};
use crate::auth::extractors::AuthUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{RefreshToken, User};
use crate::auth::token::{issue_tokens, within_refresh_window, JwtKeys};
use crate::response::{ApiError, DataResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/refresh-token", post(refresh_token))
        .route("/users", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    payload.email = payload.email.trim().to_lowercase();

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::BadRequest(format!("Email {} exist", payload.email)));
    }

    let hash = hash_password(&payload.password)?;
    let user = match User::create(
        &state.db,
        &payload.email,
        &hash,
        payload.first_name.trim(),
        payload.last_name.trim(),
    )
    .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::BadRequest(format!(
                "Error occur while creating user {}",
                payload.email
            )));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let tokens = issue_tokens(&state.db, &keys, &user).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(DataResponse::ok(tokens))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::NotFound(format!("User {} not found", payload.email))
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::BadRequest("Incorrect Password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let tokens = issue_tokens(&state.db, &keys, &user).await?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(DataResponse::ok(tokens))
}

#[instrument(skip(state, auth, payload))]
pub async fn refresh_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, ApiError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let email = auth.0.email;
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {email} not found")))?;

    let stored = RefreshToken::find_for_user(&state.db, &payload.refresh_token, user.id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user.id, "presented refresh token matches no record");
            ApiError::BadRequest("Invalid Refresh token".into())
        })?;

    // Exchange is only allowed near or past expiry; the previous record is
    // kept as issued.
    if !within_refresh_window(stored.expires_at, OffsetDateTime::now_utc()) {
        return Err(ApiError::BadRequest("The token hasn't expire".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let tokens = issue_tokens(&state.db, &keys, &user).await?;
    info!(user_id = %user.id, "tokens refreshed");
    Ok(DataResponse::ok(tokens))
}

#[instrument(skip(state, auth))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DataResponse<ProfileResponse>>, ApiError> {
    let email = auth.0.email;
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {email} not found")))?;

    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let create_at = user.created_at.format(format).context("format createAt")?;

    Ok(DataResponse::ok(ProfileResponse {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        create_at,
    }))
}
