use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    types::TrackCandidate,
    utils,
    vibe::{
        descriptor::PopularityPolicy,
        pool::{CandidatePool, artist_key},
        tables::LandmarkMatch,
    },
};

pub const DEFAULT_PIN_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct FinalizeOptions<'a> {
    pub mood_word: Option<&'a str>,
    pub max_per_artist: usize,
    pub target_count: usize,
    pub policy: PopularityPolicy,
    pub landmark: Option<&'a LandmarkMatch>,
    pub pin_limit: usize,
}

/// The pipeline's output: unique tracks, artist cap honored, at most
/// `requested` long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizedTrackList {
    tracks: Vec<TrackCandidate>,
    requested: usize,
    pinned: usize,
}

impl FinalizedTrackList {
    pub fn tracks(&self) -> &[TrackCandidate] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<TrackCandidate> {
        self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of landmark tracks pinned at the front.
    pub fn pinned(&self) -> usize {
        self.pinned
    }

    /// How many tracks short of the requested count the list is.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.tracks.len())
    }
}

/// Ordered selection that refuses duplicate ids and over-cap artists.
struct Picker {
    tracks: Vec<TrackCandidate>,
    ids: HashSet<String>,
    artist_counts: HashMap<String, usize>,
    max_per_artist: usize,
}

impl Picker {
    fn new(max_per_artist: usize) -> Self {
        Self {
            tracks: Vec::new(),
            ids: HashSet::new(),
            artist_counts: HashMap::new(),
            max_per_artist: max_per_artist.max(1),
        }
    }

    fn try_push(&mut self, track: &TrackCandidate) -> bool {
        if self.ids.contains(&track.id) {
            return false;
        }
        let count = self
            .artist_counts
            .entry(artist_key(&track.primary_artist))
            .or_insert(0);
        if *count >= self.max_per_artist {
            return false;
        }
        *count += 1;
        self.ids.insert(track.id.clone());
        self.tracks.push(track.clone());
        true
    }

    fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// Turns the policy-filtered list into the final track list.
///
/// Stages, in order: mood-word title filter, preview-first stable sort,
/// truncation, cap and uniqueness pass, landmark pinning, backfill from the
/// pool, policy ordering of the unpinned tail, final dedup.
pub fn finalize(
    filtered: Vec<TrackCandidate>,
    pool: &CandidatePool,
    options: &FinalizeOptions<'_>,
) -> FinalizedTrackList {
    let target = options.target_count;

    let mut picks: Vec<TrackCandidate> = filtered
        .into_iter()
        .filter(|t| !title_has_mood_word(t, options.mood_word))
        .collect();
    picks.sort_by_key(|t| !t.has_preview());
    picks.truncate(target);

    let mut picker = Picker::new(options.max_per_artist);
    let pinned = match options.landmark {
        Some(landmark) => pin_landmark_tracks(
            &mut picker,
            pool,
            landmark,
            options.mood_word,
            options.pin_limit.min(target),
        ),
        None => 0,
    };
    for track in &picks {
        if picker.len() >= target {
            break;
        }
        picker.try_push(track);
    }

    if picker.len() < target {
        backfill(&mut picker, pool, options);
    }

    let mut tracks = picker.tracks;
    let tail = &mut tracks[pinned..];
    match options.policy {
        PopularityPolicy::Mainstream => tail.sort_by(|a, b| b.popularity.cmp(&a.popularity)),
        PopularityPolicy::Indie => tail.sort_by(|a, b| a.popularity.cmp(&b.popularity)),
        PopularityPolicy::Mixed => {}
    }

    let mut seen = HashSet::new();
    tracks.retain(|t| seen.insert(t.id.clone()));
    tracks.truncate(target);

    FinalizedTrackList {
        tracks,
        requested: target,
        pinned,
    }
}

pub fn title_has_mood_word(track: &TrackCandidate, mood_word: Option<&str>) -> bool {
    mood_word.is_some_and(|mood| utils::contains_phrase(&track.title, mood))
}

/// How strongly a track belongs to the landmark: 0 for an anthem title,
/// 1 for a term in the title, 2 for a term in artist or album.
pub fn landmark_rank(track: &TrackCandidate, landmark: &LandmarkMatch) -> Option<u8> {
    if landmark
        .anthems
        .iter()
        .any(|anthem| utils::contains_phrase(&track.title, anthem))
    {
        return Some(0);
    }
    if landmark
        .terms
        .iter()
        .any(|term| utils::contains_phrase(&track.title, term))
    {
        return Some(1);
    }
    let in_credits = landmark.terms.iter().any(|term| {
        track
            .all_artists
            .iter()
            .any(|artist| utils::contains_phrase(artist, term))
            || utils::contains_phrase(&track.album, term)
    });
    in_credits.then_some(2)
}

/// Pins mood-clean landmark tracks, best rank first. Landmark titles carrying
/// the mood word are left to the backfill relaxation phase.
fn pin_landmark_tracks(
    picker: &mut Picker,
    pool: &CandidatePool,
    landmark: &LandmarkMatch,
    mood_word: Option<&str>,
    limit: usize,
) -> usize {
    let mut ranked: Vec<(u8, &TrackCandidate)> = pool
        .tracks()
        .iter()
        .filter(|t| !title_has_mood_word(t, mood_word))
        .filter_map(|t| landmark_rank(t, landmark).map(|rank| (rank, t)))
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);

    for (_, track) in ranked {
        if picker.len() >= limit {
            break;
        }
        picker.try_push(track);
    }
    picker.len()
}

/// Fills the picker from the whole pool in relaxation phases: mood-clean tracks
/// with a preview, mood-clean tracks without one, then tracks whose title
/// carries the mood word.
fn backfill(picker: &mut Picker, pool: &CandidatePool, options: &FinalizeOptions<'_>) {
    let mut ordered: Vec<&TrackCandidate> = pool.tracks().iter().collect();
    match options.policy {
        PopularityPolicy::Mainstream => ordered.sort_by(|a, b| b.popularity.cmp(&a.popularity)),
        PopularityPolicy::Indie => ordered.sort_by(|a, b| a.popularity.cmp(&b.popularity)),
        PopularityPolicy::Mixed => {}
    }

    let phases: [&dyn Fn(&TrackCandidate) -> bool; 3] = [
        &|t| !title_has_mood_word(t, options.mood_word) && t.has_preview(),
        &|t| !title_has_mood_word(t, options.mood_word) && !t.has_preview(),
        &|t| title_has_mood_word(t, options.mood_word),
    ];

    for phase in phases {
        for track in ordered.iter().filter(|t| phase(**t)) {
            if picker.len() >= options.target_count {
                return;
            }
            picker.try_push(track);
        }
    }
}
