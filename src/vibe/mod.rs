//! # Candidate Pipeline
//!
//! Turns a [`VibeDescriptor`] into a [`FinalizedTrackList`]:
//!
//! ```text
//! VibeDescriptor
//!     ↓  planner      directives, fallback queries, landmark match
//! QueryPlan
//!     ↓  aggregator   recommendation seed, shuffled searches, backfill
//! CandidatePool
//!     ↓  selection    mainstream / indie / mixed
//! Vec<TrackCandidate>
//!     ↓  finalizer    mood words, previews, caps, pins, backfill, dedup
//! FinalizedTrackList
//! ```
//!
//! The catalog sits behind [`crate::spotify::MusicCatalog`]; lookup data is an
//! injected [`LookupTables`]; randomness is an injected [`rand::Rng`]. With a
//! fixed catalog and a seeded RNG a run is fully reproducible.
//!
//! Catalog failures degrade the result instead of failing it. Only an invalid
//! descriptor or a rejected access token surfaces as [`PipelineError`]; an empty
//! pool is [`CandidateOutcome::NoCandidates`] and a short list reports its
//! shortfall.

mod aggregator;
mod descriptor;
mod finalizer;
mod pipeline;
mod planner;
mod pool;
mod scene;
pub mod selection;
mod tables;

pub use aggregator::{AggregatorSettings, CandidateAggregator};
pub use descriptor::{
    DEFAULT_GENRE, Energy, PopularityPolicy, SceneCategory, Tempo, VibeDescriptor,
};
pub use finalizer::{
    DEFAULT_PIN_LIMIT, FinalizeOptions, FinalizedTrackList, finalize, landmark_rank,
    title_has_mood_word,
};
pub use pipeline::{
    CandidateOutcome, DEFAULT_MAX_PER_ARTIST, DEFAULT_TARGET_COUNT, PipelineError,
    PipelineSettings, VibePipeline,
};
pub use planner::{
    AudioTargets, Bound, QueryDirective, QueryPlan, RecommendationSeed, VibeQueryPlanner,
};
pub use pool::{Admission, CandidatePool};
pub use scene::{KeywordSceneClassifier, SceneClassifier};
pub use tables::{LandmarkEntry, LandmarkMatch, LookupTables, ScenePreset};
