use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtKeys, password},
    db::{AppState, User},
    error::ApiError,
};

// Absent JSON fields deserialize to empty strings, which fail the same
// presence check as explicit empties.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub photo_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let RegisterRequest {
        name,
        email,
        password,
        photo_url,
    } = payload;

    if name.is_empty() || email.is_empty() || password.is_empty() || photo_url.is_empty() {
        return Err(ApiError::BadRequest("All fields are required"));
    }

    if state.store.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("User already exists"));
    }

    let password_hash = password::hash_password(&password)?;

    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash,
        photo_url,
        role: state.config.default_role.clone(),
        created_at: OffsetDateTime::now_utc(),
    };
    state.store.insert(&user).await?;

    info!(email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .store
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

    let ok = password::verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        // Same message as the unknown-email case so the response does not
        // reveal which check failed.
        warn!(email = %payload.email, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email, &user.role)?;

    info!(email = %user.email, "user logged in");
    Ok(Json(TokenResponse { token }))
}
