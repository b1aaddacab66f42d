//! Admin login endpoint

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, AppResult};

use crate::auth::jwt;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/auth/login — exchange admin credentials for a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    if req.username != state.config.admin_username {
        return Err(AppError::invalid_credentials());
    }

    let parsed = PasswordHash::new(&state.config.admin_password_hash)
        .map_err(|e| AppError::config(format!("Invalid ADMIN_PASSWORD_HASH: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed)
        .map_err(|_| AppError::invalid_credentials())?;

    let token = jwt::create_token(&req.username, &state.config.jwt_secret)?;
    Ok(Json(ApiResponse::success(LoginResponse { token })))
}
