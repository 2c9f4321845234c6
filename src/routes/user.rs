use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{auth::jwt::AuthUser, db::AppState, error::ApiError};

/// Public slice of the user record; nothing else leaves this endpoint.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub role: String,
}

#[instrument(skip(state, claims))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state
        .store
        .find_by_email(&claims.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %claims.email, "token for unknown user");
            ApiError::NotFound("User not found")
        })?;

    Ok(Json(ProfileResponse {
        name: user.name,
        email: user.email,
        photo_url: user.photo_url,
        role: user.role,
    }))
}
