use std::{path::Path, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error,
    management::TokenManager,
    spotify::SpotifyClient,
    utils,
    vibe::{
        CandidateOutcome, FinalizedTrackList, KeywordSceneClassifier, LookupTables,
        PipelineError, PipelineSettings, PopularityPolicy, VibeDescriptor, VibePipeline,
    },
    warning,
};

pub(crate) async fn load_vibe(path: &Path) -> VibeDescriptor {
    match utils::load_vibe_file(path, &KeywordSceneClassifier::default()).await {
        Ok(vibe) => vibe,
        Err(e) => error!("Failed to load vibe file {}: {}", path.display(), e),
    }
}

pub(crate) async fn spotify_client() -> SpotifyClient {
    let mut token_mgr = match TokenManager::load().await {
        Ok(manager) => manager,
        Err(e) => error!("Failed to load token. Please run vibelist auth\n Error: {}", e),
    };
    let token = match token_mgr.get_valid_token().await {
        Ok(token) => token,
        Err(e) => error!("Failed to refresh token. Please run vibelist auth\n Error: {}", e),
    };

    match SpotifyClient::from_config(token) {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Runs the candidate pipeline against Spotify. A seed makes the selection
/// repeatable for the same catalog responses.
pub(crate) async fn select_tracks(
    vibe: &VibeDescriptor,
    policy: PopularityPolicy,
    seed: Option<u64>,
) -> FinalizedTrackList {
    let pipeline = VibePipeline::new(
        spotify_client().await,
        Arc::new(LookupTables::builtin()),
        PipelineSettings::from_env(),
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let pb = spinner("Collecting candidate tracks...");
    let outcome = pipeline.candidates_with_rng(vibe, policy, &mut rng).await;
    pb.finish_and_clear();

    match outcome {
        Ok(CandidateOutcome::Found(list)) => list,
        Ok(CandidateOutcome::NoCandidates) => {
            warning!("Spotify returned nothing for this vibe. Try other genres or keywords.");
            std::process::exit(1);
        }
        Err(PipelineError::Unauthorized(e)) => {
            error!("Spotify rejected the token. Please run vibelist auth\n Error: {}", e)
        }
        Err(e) => error!("{}", e),
    }
}
