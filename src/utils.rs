use std::path::Path;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{
    types::{TrackCandidate, TrackTableRow},
    vibe::{SceneClassifier, VibeDescriptor},
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Lowercased words of `text`. Apostrophes stay inside words ("don't").
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

pub fn normalize_phrase(text: &str) -> String {
    words(text).join(" ")
}

/// True when the words of `needle` appear contiguously in `haystack`,
/// ignoring case and punctuation.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    let needle = words(needle);
    if needle.is_empty() {
        return false;
    }
    words(haystack)
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

/// Converts a genre name to a recommendation seed slug.
pub fn genre_slug(genre: &str) -> String {
    let lowered = genre.trim().to_lowercase();
    match lowered.as_str() {
        "r&b" | "rnb" | "r and b" => return "r-n-b".to_string(),
        "lofi" | "lo-fi" | "lo fi" => return "chill".to_string(),
        _ => {}
    }

    lowered
        .replace("r&b", "r-n-b")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Error)]
pub enum VibeFileError {
    #[error("cannot read vibe file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse vibe file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads a JSON vibe descriptor, applies boundary defaults and fills the
/// scene category when the file has none.
pub async fn load_vibe_file(
    path: &Path,
    classifier: &dyn SceneClassifier,
) -> Result<VibeDescriptor, VibeFileError> {
    let content = async_fs::read_to_string(path).await?;
    let vibe: VibeDescriptor = serde_json::from_str(&content)?;
    Ok(vibe.with_defaults().classify_scene(classifier))
}

pub fn track_table_rows(tracks: &[TrackCandidate]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            title: t.title.clone(),
            artists: t.all_artists.join(", "),
            popularity: t.popularity,
            preview: if t.has_preview() { "yes" } else { "-" }.to_string(),
        })
        .collect()
}
