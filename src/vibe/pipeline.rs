use std::{sync::Arc, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

use crate::{
    info,
    spotify::{CatalogError, MusicCatalog},
    vibe::{
        aggregator::{AggregatorSettings, CandidateAggregator},
        descriptor::{PopularityPolicy, VibeDescriptor},
        finalizer::{self, DEFAULT_PIN_LIMIT, FinalizeOptions, FinalizedTrackList},
        planner::{QueryPlan, VibeQueryPlanner},
        selection,
        tables::LookupTables,
    },
    warning,
};

pub const DEFAULT_TARGET_COUNT: usize = 20;
pub const DEFAULT_MAX_PER_ARTIST: usize = 3;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid vibe: {0}")]
    InvalidVibe(String),
    #[error("catalog authentication failed: {0}")]
    Unauthorized(CatalogError),
}

impl From<CatalogError> for PipelineError {
    fn from(err: CatalogError) -> Self {
        PipelineError::Unauthorized(err)
    }
}

/// Result of a candidate request that did not hit an input or auth error.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Found(FinalizedTrackList),
    /// The catalog produced nothing for any query.
    NoCandidates,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub target_count: usize,
    pub max_per_artist: usize,
    pub pin_limit: usize,
    pub aggregator: AggregatorSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            max_per_artist: DEFAULT_MAX_PER_ARTIST,
            pin_limit: DEFAULT_PIN_LIMIT,
            aggregator: AggregatorSettings::default(),
        }
    }
}

impl PipelineSettings {
    /// Settings from the `VIBELIST_*` environment keys, see
    /// [`crate::config::pipeline_settings`].
    pub fn from_env() -> Self {
        crate::config::pipeline_settings()
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.aggregator.call_timeout = timeout;
        self
    }
}

/// Plan, aggregate, filter and finalize in one call.
///
/// Holds no per-request state: every call builds its own pool, so concurrent
/// requests never see each other's candidates.
pub struct VibePipeline<C: MusicCatalog> {
    catalog: C,
    planner: VibeQueryPlanner,
    settings: PipelineSettings,
}

impl<C: MusicCatalog> VibePipeline<C> {
    pub fn new(catalog: C, tables: Arc<LookupTables>, settings: PipelineSettings) -> Self {
        Self {
            catalog,
            planner: VibeQueryPlanner::new(tables),
            settings,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn planner(&self) -> &VibeQueryPlanner {
        &self.planner
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn plan(&self, vibe: &VibeDescriptor) -> QueryPlan {
        self.planner.plan(vibe)
    }

    /// Candidates with fresh OS-seeded randomness, so a refresh varies.
    pub async fn candidates(
        &self,
        vibe: &VibeDescriptor,
        policy: PopularityPolicy,
    ) -> Result<CandidateOutcome, PipelineError> {
        let mut rng = StdRng::from_os_rng();
        self.candidates_with_rng(vibe, policy, &mut rng).await
    }

    pub async fn candidates_with_rng<R>(
        &self,
        vibe: &VibeDescriptor,
        policy: PopularityPolicy,
        rng: &mut R,
    ) -> Result<CandidateOutcome, PipelineError>
    where
        R: Rng + Send + ?Sized,
    {
        vibe.validate().map_err(PipelineError::InvalidVibe)?;

        let plan = self.planner.plan(vibe);
        info!(
            "Planned {} catalog queries for a {} vibe",
            plan.directives.len(),
            vibe.primary_genre()
        );

        let aggregator = CandidateAggregator::new(&self.catalog, self.settings.aggregator.clone());
        let pool = aggregator
            .aggregate(&plan, self.settings.target_count, self.settings.max_per_artist, rng)
            .await?;

        if pool.is_empty() {
            warning!("No candidates found for this vibe");
            return Ok(CandidateOutcome::NoCandidates);
        }

        let filtered = selection::filter(&pool, policy, self.settings.target_count, rng);
        let options = FinalizeOptions {
            mood_word: vibe.mood_word(),
            max_per_artist: self.settings.max_per_artist,
            target_count: self.settings.target_count,
            policy,
            landmark: plan.landmark.as_ref(),
            pin_limit: self.settings.pin_limit,
        };
        let finalized = finalizer::finalize(filtered, &pool, &options);

        if finalized.shortfall() > 0 {
            warning!(
                "Only {} of {} tracks available for this vibe",
                finalized.len(),
                finalized.requested()
            );
        }

        Ok(CandidateOutcome::Found(finalized))
    }
}
