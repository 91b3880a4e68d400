use rand::{Rng, seq::SliceRandom};

use crate::{
    types::TrackCandidate,
    vibe::{descriptor::PopularityPolicy, pool::CandidatePool},
};

const MAINSTREAM_MIN: u8 = 50;
const MAINSTREAM_RELAXED_MIN: u8 = 40;
const INDIE_MAX: u8 = 60;
const INDIE_RELAXED_MAX: u8 = 70;

const HIGH_TIER_MIN: u8 = 70;
const MID_TIER_MIN: u8 = 40;
const HIGH_TIER_SHARE: f64 = 0.35;
const MID_TIER_SHARE: f64 = 0.35;

/// Applies a popularity policy to the pool.
///
/// Never fails: a thin pool yields a short list and the finalizer deals with
/// the shortfall.
pub fn filter<R: Rng + ?Sized>(
    pool: &CandidatePool,
    policy: PopularityPolicy,
    target_count: usize,
    rng: &mut R,
) -> Vec<TrackCandidate> {
    let mut tracks = pool.tracks().to_vec();
    // Shuffled before the stable sorts so equal popularity varies per refresh.
    tracks.shuffle(rng);

    match policy {
        PopularityPolicy::Mainstream => {
            let mut kept = keep(&tracks, |p| p >= MAINSTREAM_MIN);
            if kept.len() < target_count {
                kept = keep(&tracks, |p| p >= MAINSTREAM_RELAXED_MIN);
            }
            kept.sort_by(|a, b| b.popularity.cmp(&a.popularity));
            kept
        }
        PopularityPolicy::Indie => {
            let mut kept = keep(&tracks, |p| p < INDIE_MAX);
            if kept.len() < target_count {
                kept = keep(&tracks, |p| p < INDIE_RELAXED_MAX);
            }
            kept.sort_by(|a, b| a.popularity.cmp(&b.popularity));
            kept
        }
        PopularityPolicy::Mixed => mixed(tracks, target_count, rng),
    }
}

fn keep(tracks: &[TrackCandidate], predicate: impl Fn(u8) -> bool) -> Vec<TrackCandidate> {
    tracks
        .iter()
        .filter(|t| predicate(t.popularity))
        .cloned()
        .collect()
}

/// Tier quotas for `target_count`: high, mid, low. The low tier absorbs the
/// rounding remainder.
pub fn tier_quotas(target_count: usize) -> (usize, usize, usize) {
    let high = (target_count as f64 * HIGH_TIER_SHARE).round() as usize;
    let mid = (target_count as f64 * MID_TIER_SHARE).round() as usize;
    let high = high.min(target_count);
    let mid = mid.min(target_count - high);
    (high, mid, target_count - high - mid)
}

fn mixed<R: Rng + ?Sized>(
    tracks: Vec<TrackCandidate>,
    target_count: usize,
    rng: &mut R,
) -> Vec<TrackCandidate> {
    let mut high = Vec::new();
    let mut mid = Vec::new();
    let mut low = Vec::new();
    for track in tracks {
        if track.popularity >= HIGH_TIER_MIN {
            high.push(track);
        } else if track.popularity >= MID_TIER_MIN {
            mid.push(track);
        } else {
            low.push(track);
        }
    }

    let (high_quota, mid_quota, low_quota) = tier_quotas(target_count);
    let mut selected = Vec::with_capacity(target_count);
    let mut leftovers = Vec::new();

    for (mut tier, quota) in [(high, high_quota), (mid, mid_quota), (low, low_quota)] {
        tier.shuffle(rng);
        let rest = tier.split_off(quota.min(tier.len()));
        selected.extend(tier);
        leftovers.extend(rest);
    }

    if selected.len() < target_count {
        leftovers.shuffle(rng);
        let missing = target_count - selected.len();
        selected.extend(leftovers.into_iter().take(missing));
    }

    selected.shuffle(rng);
    selected
}
