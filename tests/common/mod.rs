#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;
use vibelist::{
    spotify::{CatalogError, MusicCatalog},
    types::TrackCandidate,
    vibe::RecommendationSeed,
};

// Helper function to create a test track
pub fn track(id: &str, title: &str, artist: &str, popularity: u8, preview: bool) -> TrackCandidate {
    TrackCandidate {
        id: id.to_string(),
        title: title.to_string(),
        primary_artist: artist.to_string(),
        all_artists: vec![artist.to_string()],
        album: format!("{} album", artist),
        duration_ms: 200_000,
        popularity,
        preview_url: preview.then(|| format!("https://p.scdn.co/mp3-preview/{}", id)),
        external_url: Some(format!("https://open.spotify.com/track/{}", id)),
        uri: format!("spotify:track:{}", id),
    }
}

/// `count` tracks by distinct artists, popularity spread evenly over
/// `low..=high`, all with previews.
pub fn spread(prefix: &str, count: usize, low: u8, high: u8) -> Vec<TrackCandidate> {
    (0..count)
        .map(|i| {
            let step = if count > 1 {
                (high - low) as usize * i / (count - 1)
            } else {
                0
            };
            track(
                &format!("{}{}", prefix, i),
                &format!("Song {} {}", prefix, i),
                &format!("Artist {} {}", prefix, i),
                low + step as u8,
                true,
            )
        })
        .collect()
}

/// In-memory catalog. Searches are paged by offset over the list registered for
/// the query, or over `default_search` when the query is unknown.
#[derive(Default)]
pub struct MockCatalog {
    pub default_search: Vec<TrackCandidate>,
    pub by_query: HashMap<String, Vec<TrackCandidate>>,
    pub recommended: Vec<TrackCandidate>,
    pub artists: HashMap<String, String>,
    pub search_error: Option<CatalogError>,
    pub recommendation_error: Option<CatalogError>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
    pub seeds: Mutex<Vec<RecommendationSeed>>,
}

impl MockCatalog {
    pub fn with_search(tracks: Vec<TrackCandidate>) -> Self {
        Self {
            default_search: tracks,
            ..Default::default()
        }
    }

    pub fn with_recommendations(tracks: Vec<TrackCandidate>) -> Self {
        Self {
            recommended: tracks,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("search:"))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn page(tracks: &[TrackCandidate], limit: u32, offset: u32) -> Vec<TrackCandidate> {
    tracks
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl MusicCatalog for MockCatalog {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<TrackCandidate>, CatalogError> {
        self.record(format!("search:{}@{}", query, offset));
        self.pause().await;
        if let Some(err) = &self.search_error {
            return Err(err.clone());
        }
        let source = self.by_query.get(query).unwrap_or(&self.default_search);
        Ok(page(source, limit, offset))
    }

    async fn search_artist(&self, name: &str) -> Result<Option<String>, CatalogError> {
        self.record(format!("artist:{}", name));
        self.pause().await;
        Ok(self.artists.get(name).cloned())
    }

    async fn recommendations(
        &self,
        seed: &RecommendationSeed,
        limit: u32,
    ) -> Result<Vec<TrackCandidate>, CatalogError> {
        self.record("recommendations".to_string());
        self.seeds.lock().unwrap().push(seed.clone());
        self.pause().await;
        if let Some(err) = &self.recommendation_error {
            return Err(err.clone());
        }
        Ok(page(&self.recommended, limit, 0))
    }
}
