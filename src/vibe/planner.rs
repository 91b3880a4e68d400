use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::Serialize;

use crate::{
    utils,
    vibe::{
        descriptor::{Energy, Tempo, VibeDescriptor},
        tables::{LandmarkMatch, LookupTables},
    },
};

pub const MAX_SEED_ARTISTS: usize = 5;
pub const MAX_SEED_GENRES: usize = 2;
pub const MAX_ARTIST_QUERIES: usize = 15;
pub const DEFAULT_MAX_SEARCHES: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    Target,
    Min,
    Max,
}

impl Bound {
    fn prefix(&self) -> &'static str {
        match self {
            Bound::Target => "target",
            Bound::Min => "min",
            Bound::Max => "max",
        }
    }
}

/// Audio-feature constraints keyed by their recommendation parameter name,
/// e.g. `target_energy` or `max_tempo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioTargets(BTreeMap<String, f64>);

impl AudioTargets {
    pub fn with(mut self, bound: Bound, feature: &str, value: f64) -> Self {
        self.set(bound, feature, value);
        self
    }

    pub fn set(&mut self, bound: Bound, feature: &str, value: f64) {
        self.0
            .insert(format!("{}_{}", bound.prefix(), feature), value);
    }

    pub fn get(&self, bound: Bound, feature: &str) -> Option<f64> {
        self.0
            .get(&format!("{}_{}", bound.prefix(), feature))
            .copied()
    }

    /// Copies every entry of `other` over this one.
    pub fn merge(&mut self, other: &AudioTargets) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), *value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationSeed {
    pub artist_ids: Vec<String>,
    pub genres: Vec<String>,
    pub targets: AudioTargets,
}

impl RecommendationSeed {
    pub fn has_seeds(&self) -> bool {
        !self.artist_ids.is_empty() || !self.genres.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryDirective {
    KeywordSearch { query: String },
    ArtistSearch { name: String },
    RecommendationSeed(RecommendationSeed),
}

impl fmt::Display for QueryDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryDirective::KeywordSearch { query } => write!(f, "search {}", query),
            QueryDirective::ArtistSearch { name } => write!(f, "resolve artist {}", name),
            QueryDirective::RecommendationSeed(seed) => {
                let targets = seed
                    .targets
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(
                    f,
                    "recommend genres=[{}] artists={} {}",
                    seed.genres.join(","),
                    seed.artist_ids.len(),
                    targets
                )
            }
        }
    }
}

/// Everything the aggregator and finalizer need from planning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPlan {
    pub directives: Vec<QueryDirective>,
    /// Broad queries for the primary genre, used when the pool runs dry.
    pub fallback_queries: Vec<String>,
    pub landmark: Option<LandmarkMatch>,
}

impl QueryPlan {
    pub fn recommendation_seed(&self) -> Option<&RecommendationSeed> {
        self.directives.iter().find_map(|d| match d {
            QueryDirective::RecommendationSeed(seed) => Some(seed),
            _ => None,
        })
    }

    pub fn artist_searches(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            QueryDirective::ArtistSearch { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn keyword_searches(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().filter_map(|d| match d {
            QueryDirective::KeywordSearch { query } => Some(query.as_str()),
            _ => None,
        })
    }
}

/// Turns a vibe into catalog queries.
#[derive(Debug, Clone)]
pub struct VibeQueryPlanner {
    tables: Arc<LookupTables>,
    max_searches: usize,
}

impl VibeQueryPlanner {
    pub fn new(tables: Arc<LookupTables>) -> Self {
        Self {
            tables,
            max_searches: DEFAULT_MAX_SEARCHES,
        }
    }

    pub fn with_max_searches(mut self, max_searches: usize) -> Self {
        self.max_searches = max_searches.max(1);
        self
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn plan(&self, vibe: &VibeDescriptor) -> QueryPlan {
        let landmark = self
            .tables
            .match_landmark(vibe.landmark.as_deref(), vibe.description.as_deref());
        let scene = vibe
            .scene_category
            .and_then(|category| self.tables.scene_preset(category));

        let mut artists: Vec<String> = Vec::new();
        let mut search_genres: Vec<String> = Vec::new();
        let seed_genres: Vec<String>;
        let targets: AudioTargets;

        match scene {
            Some(preset) => {
                push_unique(&mut artists, preset.artists.iter().cloned());
                push_unique(&mut search_genres, preset.search_genre.iter().cloned());
                seed_genres = preset
                    .seed_genres
                    .iter()
                    .take(MAX_SEED_GENRES)
                    .cloned()
                    .collect();
                targets = preset.targets.clone();
            }
            None => {
                let mut slugs = Vec::new();
                push_unique(&mut slugs, vibe.genres.iter().map(|g| utils::genre_slug(g)));
                slugs.truncate(MAX_SEED_GENRES);
                seed_genres = slugs;
                targets = self.feature_targets(vibe);
            }
        }
        push_unique(&mut artists, vibe.artists.iter().cloned());
        push_unique(&mut search_genres, vibe.genres.iter().cloned());

        let mut directives = Vec::new();
        let seed_artists: Vec<&String> = artists.iter().take(MAX_SEED_ARTISTS).collect();
        if !seed_genres.is_empty() || !seed_artists.is_empty() {
            directives.push(QueryDirective::RecommendationSeed(RecommendationSeed {
                artist_ids: Vec::new(),
                genres: seed_genres,
                targets,
            }));
        }
        for name in &seed_artists {
            directives.push(QueryDirective::ArtistSearch {
                name: (*name).clone(),
            });
        }

        let searches = self.keyword_queries(vibe, &artists, &search_genres, landmark.as_ref());
        directives.extend(
            searches
                .into_iter()
                .map(|query| QueryDirective::KeywordSearch { query }),
        );

        let primary = search_genres
            .first()
            .map(String::as_str)
            .unwrap_or(vibe.primary_genre());
        let fallback_queries = vec![
            primary.to_string(),
            format!("popular {}", primary),
            format!("genre:\"{}\"", primary),
        ];

        QueryPlan {
            directives,
            fallback_queries,
            landmark,
        }
    }

    /// Energy, tempo and mood mapped to recommendation targets. Mood entries
    /// win over energy where both set the same key.
    fn feature_targets(&self, vibe: &VibeDescriptor) -> AudioTargets {
        let mut targets = AudioTargets::default();

        match vibe.energy {
            Energy::High => {
                targets.set(Bound::Target, "energy", 0.8);
                targets.set(Bound::Min, "energy", 0.6);
            }
            Energy::Low => {
                targets.set(Bound::Target, "energy", 0.3);
                targets.set(Bound::Max, "energy", 0.5);
            }
            Energy::Medium => targets.set(Bound::Target, "energy", 0.5),
        }

        match vibe.tempo {
            Tempo::Fast => {
                targets.set(Bound::Target, "tempo", 140.0);
                targets.set(Bound::Min, "tempo", 120.0);
            }
            Tempo::Slow => {
                targets.set(Bound::Target, "tempo", 80.0);
                targets.set(Bound::Max, "tempo", 100.0);
            }
            Tempo::Moderate => targets.set(Bound::Target, "tempo", 110.0),
        }

        if let Some(mood_targets) = vibe.mood_word().and_then(|m| self.tables.mood_targets(m)) {
            targets.merge(mood_targets);
        }

        targets
    }

    fn keyword_queries(
        &self,
        vibe: &VibeDescriptor,
        artists: &[String],
        genres: &[String],
        landmark: Option<&LandmarkMatch>,
    ) -> Vec<String> {
        let mut queries: Vec<String> = Vec::new();

        if let Some(landmark) = landmark {
            push_unique(
                &mut queries,
                landmark.anthems.iter().map(|title| format!("\"{}\"", title)),
            );
            push_unique(
                &mut queries,
                ["fight song", "anthem", "song"]
                    .iter()
                    .map(|suffix| format!("{} {}", landmark.query_name, suffix)),
            );
        }

        push_unique(
            &mut queries,
            artists
                .iter()
                .take(MAX_ARTIST_QUERIES)
                .map(|name| format!("artist:\"{}\"", name)),
        );

        if let Some(mood) = vibe.mood_word() {
            push_unique(&mut queries, genres.iter().map(|g| format!("{} {}", g, mood)));
        }

        let energy_word = match vibe.energy {
            Energy::High => Some("energetic"),
            Energy::Low => Some("mellow"),
            Energy::Medium => None,
        };
        let tempo_word = match vibe.tempo {
            Tempo::Fast => Some("upbeat"),
            Tempo::Slow => Some("slow"),
            Tempo::Moderate => None,
        };
        for genre in genres {
            push_unique(
                &mut queries,
                [energy_word, tempo_word]
                    .into_iter()
                    .flatten()
                    .map(|word| format!("{} {}", word, genre)),
            );
        }

        for genre in genres.iter().take(2) {
            push_unique(
                &mut queries,
                vibe.keywords.iter().map(|k| format!("{} {}", genre, k)),
            );
        }

        queries.truncate(self.max_searches);
        queries
    }
}

/// Appends values not already present, comparing case-insensitively.
fn push_unique(target: &mut Vec<String>, values: impl IntoIterator<Item = String>) {
    for value in values {
        if value.is_empty() || target.iter().any(|t| t.eq_ignore_ascii_case(&value)) {
            continue;
        }
        target.push(value);
    }
}
