use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{spotify::PlaylistError, vibe::PipelineError};

#[derive(Debug)]
pub enum ApiError {
    InvalidVibe(String),
    BadRequest(String),
    Unauthorized(String),
    NoCandidates,
    Upstream(String),
    Config(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidVibe(msg) => ApiError::InvalidVibe(msg),
            PipelineError::Unauthorized(e) => ApiError::Unauthorized(e.to_string()),
        }
    }
}

impl From<PlaylistError> for ApiError {
    fn from(err: PlaylistError) -> Self {
        match err {
            PlaylistError::Catalog(e) if e.is_auth() => ApiError::Unauthorized(e.to_string()),
            PlaylistError::Catalog(e) => ApiError::Upstream(e.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidVibe(msg) => (StatusCode::BAD_REQUEST, format!("Invalid vibe: {}", msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                format!("Spotify authorization required: {}", msg),
            ),
            ApiError::NoCandidates => (
                StatusCode::NOT_FOUND,
                "No candidate tracks found for this vibe".to_string(),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, format!("Spotify error: {}", msg)),
            ApiError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server misconfigured: {}", msg),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
