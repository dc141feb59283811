use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use guildhall_core::{DiscordError, StoreError};
use log::error;
use serde_json::json;
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Discord OAuth not configured")]
    Unconfigured,
    #[error("Discord authentication failed: {0}")]
    UpstreamAuth(String),
    #[error("Unauthorized - Discord login required")]
    Unauthorized,
    #[error("Forbidden - Admin role required")]
    Forbidden,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamAuth(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();

        let body = match &self {
            Self::Unconfigured => json!({
                "error": self.to_string(),
                "message": "Set the DISCORD_* variables in the environment or a .env file",
            }),
            Self::Store(e) => {
                error!("request failed against the store: {e}");
                json!({ "error": "Internal server error" })
            }
            Self::Unknown(e) => {
                error!("request failed: {e}");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DiscordError> for ServerError {
    fn from(value: DiscordError) -> Self {
        match value {
            DiscordError::Unconfigured => Self::Unconfigured,
            e => Self::UpstreamAuth(e.to_string()),
        }
    }
}
