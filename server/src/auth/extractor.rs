//! Staff Extractor
//!
//! Axum extractor that validates the bearer token and yields the
//! authenticated staff member. Every staff-only handler takes a
//! [`CurrentStaff`] argument; unauthenticated requests are rejected before
//! the order service is reached.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{Claims, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// The authenticated staff member behind a request
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    pub username: String,
    pub role: String,
}

impl From<Claims> for CurrentStaff {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            role: claims.role,
        }
    }
}

impl FromRequestParts<ServerState> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse a previous extraction on the same request
        if let Some(staff) = parts.extensions.get::<CurrentStaff>() {
            return Ok(staff.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        match state.jwt_service().validate_token(token) {
            Ok(claims) => {
                let staff = CurrentStaff::from(claims);
                parts.extensions.insert(staff.clone());
                Ok(staff)
            }
            Err(e) => {
                security_log!(
                    "WARN",
                    "auth_failed",
                    error = format!("{e}"),
                    uri = format!("{:?}", parts.uri)
                );
                match e {
                    JwtError::ExpiredToken => Err(AppError::token_expired()),
                    _ => Err(AppError::invalid_token("Invalid token")),
                }
            }
        }
    }
}
