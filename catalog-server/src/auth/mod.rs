//! Admin authentication
//!
//! JWT bearer auth for the admin API. The middleware verifies the token,
//! checks the admin role, and inserts an [`AdminIdentity`] into request
//! extensions for downstream handlers.

pub mod jwt;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// Authenticated admin identity extracted from JWT
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

/// Middleware that extracts and verifies the admin JWT from the Authorization header
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
                .into_response()
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "Invalid Authorization format")
            .into_response()
    })?;

    let claims =
        jwt::verify_token(token, &state.config.jwt_secret).map_err(|e| e.into_response())?;

    if claims.role != "admin" {
        return Err(AppError::new(ErrorCode::AdminRequired).into_response());
    }

    request.extensions_mut().insert(AdminIdentity {
        username: claims.sub,
    });

    Ok(next.run(request).await)
}
