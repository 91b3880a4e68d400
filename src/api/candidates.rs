use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiError, ApiState},
    info,
    types::TrackCandidate,
    vibe::{CandidateOutcome, PopularityPolicy, VibeDescriptor},
};

#[derive(Debug, Deserialize)]
pub struct CandidatesRequest {
    pub vibe: VibeDescriptor,
    #[serde(default)]
    pub policy: PopularityPolicy,
}

#[derive(Debug, Serialize)]
pub struct CandidatesResponse {
    pub tracks: Vec<TrackCandidate>,
    pub requested: usize,
    pub returned: usize,
    pub shortfall: usize,
    pub pinned: usize,
}

/// POST /api/candidates
///
/// Every call draws fresh randomness, so posting the same vibe again is the
/// "refresh" gesture.
pub async fn candidates(
    State(state): State<ApiState>,
    Json(request): Json<CandidatesRequest>,
) -> Result<Json<CandidatesResponse>, ApiError> {
    let vibe = state.prepare_vibe(request.vibe);
    let pipeline = state.pipeline().await?;

    match pipeline.candidates(&vibe, request.policy).await? {
        CandidateOutcome::NoCandidates => Err(ApiError::NoCandidates),
        CandidateOutcome::Found(list) => {
            info!(
                "Serving {} {} candidates for a {} vibe",
                list.len(),
                request.policy,
                vibe.primary_genre()
            );
            let requested = list.requested();
            let shortfall = list.shortfall();
            let pinned = list.pinned();
            let tracks = list.into_tracks();

            Ok(Json(CandidatesResponse {
                returned: tracks.len(),
                tracks,
                requested,
                shortfall,
                pinned,
            }))
        }
    }
}
