use std::{future::Future, time::Duration};

use futures::future::join_all;
use rand::{Rng, seq::SliceRandom};

use crate::{
    info,
    spotify::{CatalogError, MusicCatalog},
    vibe::{
        planner::{MAX_SEED_ARTISTS, QueryPlan},
        pool::CandidatePool,
    },
    warning,
};

/// Pool size multipliers relative to the requested pool size.
const EARLY_STOP_FACTOR: usize = 3;
const BACKFILL_FACTOR: usize = 2;

#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub call_timeout: Duration,
    pub search_limit: u32,
    pub recommendation_limit: u32,
    pub max_backfill_rounds: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
            search_limit: 50,
            recommendation_limit: 100,
            max_backfill_rounds: 5,
        }
    }
}

/// Executes a [`QueryPlan`] against a catalog and collects a candidate pool.
///
/// Every catalog call is isolated: a failure or timeout is logged and counts as
/// zero results, except an authentication failure, which is returned because no
/// other call can succeed with the same token.
pub struct CandidateAggregator<'a, C: MusicCatalog + ?Sized> {
    catalog: &'a C,
    settings: AggregatorSettings,
}

impl<'a, C: MusicCatalog + ?Sized> CandidateAggregator<'a, C> {
    pub fn new(catalog: &'a C, settings: AggregatorSettings) -> Self {
        Self { catalog, settings }
    }

    /// Runs the recommendation seed, then the keyword searches in random
    /// order, then backfill rounds if the pool is still thin.
    ///
    /// Searches stop once the pool holds `target_pool_size * 3` tracks. Backfill
    /// runs while it holds fewer than `target_pool_size * 2`.
    pub async fn aggregate<R>(
        &self,
        plan: &QueryPlan,
        target_pool_size: usize,
        max_per_artist: usize,
        rng: &mut R,
    ) -> Result<CandidatePool, CatalogError>
    where
        R: Rng + Send + ?Sized,
    {
        let mut pool = CandidatePool::new(max_per_artist);
        let ceiling = target_pool_size.saturating_mul(EARLY_STOP_FACTOR);
        let floor = target_pool_size.saturating_mul(BACKFILL_FACTOR);

        let mut searches: Vec<&str> = plan.keyword_searches().collect();
        searches.shuffle(rng);

        if let Some(seed) = plan.recommendation_seed() {
            let mut seed = seed.clone();
            for id in self.resolve_artists(plan).await? {
                if seed.artist_ids.len() >= MAX_SEED_ARTISTS {
                    break;
                }
                if !seed.artist_ids.contains(&id) {
                    seed.artist_ids.push(id);
                }
            }

            if seed.has_seeds() {
                let result = self
                    .timed(
                        self.catalog
                            .recommendations(&seed, self.settings.recommendation_limit),
                    )
                    .await;
                let added = pool.extend(absorb(result, "recommendations")?);
                info!("Recommendations contributed {} candidates", added);
            }
        }

        for query in searches {
            if pool.len() >= ceiling {
                break;
            }
            let result = self
                .timed(
                    self.catalog
                        .search_tracks(query, self.settings.search_limit, 0),
                )
                .await;
            pool.extend(absorb(result, query)?);
        }

        if pool.len() < floor {
            self.backfill(plan, &mut pool, floor).await?;
        }

        Ok(pool)
    }

    /// Resolves the plan's artist names to catalog ids concurrently.
    /// Unknown names are dropped.
    async fn resolve_artists(&self, plan: &QueryPlan) -> Result<Vec<String>, CatalogError> {
        let lookups = plan
            .artist_searches()
            .take(MAX_SEED_ARTISTS)
            .map(|name| async move { (name, self.timed(self.catalog.search_artist(name)).await) });

        let mut ids = Vec::new();
        for (name, result) in join_all(lookups).await {
            if let Some(id) = absorb(result, &format!("artist lookup '{}'", name))? {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn backfill(
        &self,
        plan: &QueryPlan,
        pool: &mut CandidatePool,
        floor: usize,
    ) -> Result<(), CatalogError> {
        for round in 0..self.settings.max_backfill_rounds {
            let offset = (round as u32).saturating_mul(self.settings.search_limit);
            let mut added = 0;

            for query in &plan.fallback_queries {
                if pool.len() >= floor {
                    return Ok(());
                }
                let result = self
                    .timed(
                        self.catalog
                            .search_tracks(query, self.settings.search_limit, offset),
                    )
                    .await;
                added += pool.extend(absorb(result, query)?);
            }

            if added == 0 {
                warning!(
                    "Backfill round {} found nothing new, stopping with {} candidates",
                    round + 1,
                    pool.len()
                );
                break;
            }
        }
        Ok(())
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, CatalogError>>,
    ) -> Result<T, CatalogError> {
        match tokio::time::timeout(self.settings.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout),
        }
    }
}

/// Turns a failed call into an empty result unless it is an auth failure.
fn absorb<T: Default>(result: Result<T, CatalogError>, context: &str) -> Result<T, CatalogError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_auth() => Err(err),
        Err(err) => {
            warning!("{} failed, continuing without it: {}", context, err);
            Ok(T::default())
        }
    }
}
