//! Login endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use pokedex_core::LoginError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use super::{error_response, ErrorResponse};
use crate::metrics::LOGINS_TOTAL;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for logging in. Both fields are optional so that a missing
/// field is reported as bad credentials rather than a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    pub username: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

// ============================================================================
// Handlers
// ============================================================================

/// Exchange the fixed credentials for a session token.
///
/// Any body that is not a JSON object with string `username` and `password`
/// counts as missing credentials.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let body: LoginBody = serde_json::from_slice(&body).unwrap_or_default();

    match state
        .login()
        .login(body.username.as_deref(), body.password.as_deref())
    {
        Ok(session) => {
            LOGINS_TOTAL.with_label_values(&["success"]).inc();
            info!(username = %session.username, "Login succeeded");

            Ok(Json(LoginResponse {
                token: session.token,
                user: LoginUser {
                    username: session.username,
                },
            }))
        }
        Err(LoginError::InvalidCredentials) => {
            LOGINS_TOTAL
                .with_label_values(&["invalid_credentials"])
                .inc();
            Err(error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid credentials",
            ))
        }
        Err(e) => {
            LOGINS_TOTAL.with_label_values(&["error"]).inc();
            error!("Failed to issue session token: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to issue token",
            ))
        }
    }
}
