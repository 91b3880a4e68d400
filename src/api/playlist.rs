use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::{
    api::{ApiError, ApiState},
    config,
    spotify::{MaterializedPlaylist, PlaylistMaterializer, PlaylistOptions},
    types::TrackCandidate,
    vibe::VibeDescriptor,
};

#[derive(Debug, Deserialize)]
pub struct PlaylistRequest {
    pub vibe: VibeDescriptor,
    pub tracks: Vec<TrackCandidate>,
    pub name: Option<String>,
    #[serde(default)]
    pub public: bool,
    pub cover_jpeg_base64: Option<String>,
}

/// POST /api/playlist
pub async fn playlist(
    State(state): State<ApiState>,
    Json(request): Json<PlaylistRequest>,
) -> Result<(StatusCode, Json<MaterializedPlaylist>), ApiError> {
    if request.tracks.is_empty() {
        return Err(ApiError::BadRequest("tracks must not be empty".to_string()));
    }

    let user_id = config::spotify_user().map_err(|e| ApiError::Config(e.to_string()))?;
    let vibe = state.prepare_vibe(request.vibe);
    let client = state.client().await?;

    let options = PlaylistOptions {
        name: request.name,
        public: request.public,
        cover_jpeg_base64: request.cover_jpeg_base64,
    };
    let created = PlaylistMaterializer::new(&client, user_id)
        .materialize(&request.tracks, &vibe, &options)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
