pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod pokemons;
pub mod routes;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Error body shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `(status, {"error": message})` response.
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
