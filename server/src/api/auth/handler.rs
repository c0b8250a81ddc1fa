use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

/// POST /api/auth/login
///
/// All failure modes share one 401 message so usernames cannot be probed.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let (username, password) = match (req.username, req.password) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u, p),
        _ => return Err(AppError::validation("Username and password are required")),
    };

    if !state.credentials.verify(&username, &password) {
        security_log!("WARN", "login_failed", username = username.as_str());
        return Err(AppError::invalid_credentials());
    }

    let username = state.credentials.username().to_string();
    let token = state
        .jwt_service()
        .generate_token(&username, "admin")
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    security_log!("INFO", "login_ok", username = username.as_str());
    Ok(ok_with_message(
        LoginResponse { token, username },
        "Login successful",
    ))
}
