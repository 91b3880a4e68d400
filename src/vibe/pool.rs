use std::collections::{HashMap, HashSet};

use crate::types::TrackCandidate;

/// Outcome of offering a track to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    Duplicate,
    ArtistCapped,
}

/// Deduplicated, artist-capped working set of candidates.
///
/// Keeps insertion order so that a seeded run is reproducible end to end.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    tracks: Vec<TrackCandidate>,
    ids: HashSet<String>,
    artist_counts: HashMap<String, usize>,
    max_per_artist: usize,
}

impl CandidatePool {
    pub fn new(max_per_artist: usize) -> Self {
        Self {
            tracks: Vec::new(),
            ids: HashSet::new(),
            artist_counts: HashMap::new(),
            max_per_artist: max_per_artist.max(1),
        }
    }

    pub fn insert(&mut self, track: TrackCandidate) -> Admission {
        if self.ids.contains(&track.id) {
            return Admission::Duplicate;
        }

        let key = artist_key(&track.primary_artist);
        let count = self.artist_counts.get(&key).copied().unwrap_or(0);
        if count >= self.max_per_artist {
            return Admission::ArtistCapped;
        }

        self.artist_counts.insert(key, count + 1);
        self.ids.insert(track.id.clone());
        self.tracks.push(track);
        Admission::Added
    }

    /// Inserts every track and returns how many were new.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = TrackCandidate>) -> usize {
        let mut added = 0;
        for track in tracks {
            if self.insert(track) == Admission::Added {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn max_per_artist(&self) -> usize {
        self.max_per_artist
    }

    pub fn tracks(&self) -> &[TrackCandidate] {
        &self.tracks
    }

    pub fn ids(&self) -> HashSet<String> {
        self.ids.clone()
    }
}

/// Artist names are compared case-insensitively for capping.
pub fn artist_key(name: &str) -> String {
    name.trim().to_lowercase()
}
