//! Static lookup data for the query planner.
//!
//! Everything here is built once and never mutated afterwards. The planner gets
//! a [`LookupTables`] at construction time, so tests can hand it a small
//! substitute table instead of the defaults.

use std::collections::{BTreeMap, HashMap};

use crate::{
    utils,
    vibe::{
        descriptor::SceneCategory,
        planner::{AudioTargets, Bound},
    },
};

/// Landmark field values too generic to stand for a single institution.
const GENERIC_PLACE_WORDS: &[&str] = &["university", "college", "school", "campus", "state"];

/// An institution with known anthems or fight songs.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkEntry {
    /// Display name used in generic queries.
    pub name: String,
    pub aliases: Vec<String>,
    /// Exact song titles searched as quoted phrases.
    pub anthems: Vec<String>,
    /// Words that mark a track as belonging to the landmark.
    pub terms: Vec<String>,
}

/// The result of matching a vibe against the landmark table.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkMatch {
    pub key: String,
    /// Name used in `"<name> fight song"` style queries.
    pub query_name: String,
    pub anthems: Vec<String>,
    pub terms: Vec<String>,
}

/// A scene override: fixed seeds, curated artists and feature targets.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePreset {
    pub seed_genres: Vec<String>,
    /// Sub-genre forced to the front of the search genres.
    pub search_genre: Option<String>,
    pub artists: Vec<String>,
    pub targets: AudioTargets,
}

#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    landmarks: BTreeMap<String, LandmarkEntry>,
    moods: HashMap<String, AudioTargets>,
    scenes: HashMap<SceneCategory, ScenePreset>,
}

impl LookupTables {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_landmark(mut self, entry: LandmarkEntry) -> Self {
        let key = utils::normalize_phrase(&entry.name);
        self.landmarks.insert(key, entry);
        self
    }

    pub fn with_mood(mut self, moods: &[&str], targets: AudioTargets) -> Self {
        for mood in moods {
            self.moods
                .insert(utils::normalize_phrase(mood), targets.clone());
        }
        self
    }

    pub fn with_scene(mut self, category: SceneCategory, preset: ScenePreset) -> Self {
        self.scenes.insert(category, preset);
        self
    }

    pub fn mood_targets(&self, mood: &str) -> Option<&AudioTargets> {
        self.moods.get(&utils::normalize_phrase(mood))
    }

    pub fn scene_preset(&self, category: SceneCategory) -> Option<&ScenePreset> {
        self.scenes.get(&category)
    }

    /// Looks the landmark field up first, then the free-text description.
    ///
    /// A needle (the normalized name or an alias) matches when it equals the
    /// text, appears in it as a whole phrase, or, for the landmark field only,
    /// when the text is a phrase of the needle ("Duke" -> "duke university").
    /// The longest matching needle wins.
    pub fn match_landmark(
        &self,
        landmark: Option<&str>,
        description: Option<&str>,
    ) -> Option<LandmarkMatch> {
        if let Some(text) = landmark {
            if let Some((key, entry)) = self.best_landmark(text, true) {
                return Some(to_match(key, entry, text.trim()));
            }
        }

        let (key, entry) = self.best_landmark(description?, false)?;
        Some(to_match(key, entry, &entry.name))
    }

    fn best_landmark(&self, text: &str, allow_partial: bool) -> Option<(&str, &LandmarkEntry)> {
        let normalized = utils::normalize_phrase(text);
        if normalized.is_empty() {
            return None;
        }
        let allow_partial = allow_partial && !GENERIC_PLACE_WORDS.contains(&normalized.as_str());

        let mut best: Option<(usize, &str, &LandmarkEntry)> = None;
        for (key, entry) in &self.landmarks {
            let needles = std::iter::once(key.clone())
                .chain(entry.aliases.iter().map(|a| utils::normalize_phrase(a)));

            for needle in needles {
                let hit = normalized == needle
                    || utils::contains_phrase(&normalized, &needle)
                    || (allow_partial && utils::contains_phrase(&needle, &normalized));
                if hit && best.is_none_or(|(len, _, _)| needle.len() > len) {
                    best = Some((needle.len(), key.as_str(), entry));
                }
            }
        }

        best.map(|(_, key, entry)| (key, entry))
    }
}

fn to_match(key: &str, entry: &LandmarkEntry, query_name: &str) -> LandmarkMatch {
    LandmarkMatch {
        key: key.to_string(),
        query_name: query_name.to_string(),
        anthems: entry.anthems.clone(),
        terms: entry.terms.clone(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn landmark(name: &str, aliases: &[&str], anthems: &[&str], terms: &[&str]) -> LandmarkEntry {
    LandmarkEntry {
        name: name.to_string(),
        aliases: strings(aliases),
        anthems: strings(anthems),
        terms: strings(terms),
    }
}

impl LookupTables {
    /// The tables shipped with vibelist.
    pub fn builtin() -> Self {
        Self::empty()
            .with_landmark(landmark(
                "Duke University",
                &["duke", "blue devils", "duke blue devils"],
                &["Fight! Blue Devils, Fight!", "Blue and White", "Dear Old Duke"],
                &["duke", "blue devils"],
            ))
            .with_landmark(landmark(
                "University of Michigan",
                &["umich", "michigan wolverines", "ann arbor"],
                &["The Victors", "Hail to the Victors", "The Yellow and Blue"],
                &["michigan", "victors", "wolverines"],
            ))
            .with_landmark(landmark(
                "University of Notre Dame",
                &["notre dame", "fighting irish"],
                &["Notre Dame Victory March", "Notre Dame, Our Mother"],
                &["notre dame", "fighting irish"],
            ))
            .with_landmark(landmark(
                "Ohio State University",
                &["ohio state", "buckeyes"],
                &["Buckeye Battle Cry", "Carmen Ohio", "Across the Field"],
                &["ohio state", "buckeye", "carmen ohio"],
            ))
            .with_landmark(landmark(
                "University of Southern California",
                &["usc", "usc trojans"],
                &["Fight On", "Conquest"],
                &["usc", "trojans", "fight on"],
            ))
            .with_landmark(landmark(
                "University of Texas",
                &["ut austin", "texas longhorns", "longhorns"],
                &["The Eyes of Texas", "Texas Fight"],
                &["texas", "longhorns"],
            ))
            .with_landmark(landmark(
                "Georgia Tech",
                &["georgia institute of technology", "yellow jackets"],
                &["Ramblin' Wreck from Georgia Tech"],
                &["georgia tech", "ramblin' wreck"],
            ))
            .with_landmark(landmark(
                "University of Wisconsin",
                &["uw madison", "wisconsin badgers"],
                &["On, Wisconsin!", "Varsity"],
                &["wisconsin", "badgers"],
            ))
            .with_mood(
                &["happy", "upbeat", "energetic"],
                AudioTargets::default()
                    .with(Bound::Target, "valence", 0.8)
                    .with(Bound::Target, "danceability", 0.7),
            )
            .with_mood(
                &["sad", "melancholic"],
                AudioTargets::default()
                    .with(Bound::Target, "valence", 0.3)
                    .with(Bound::Max, "valence", 0.5),
            )
            .with_mood(
                &["calm", "chill", "peaceful"],
                AudioTargets::default()
                    .with(Bound::Target, "energy", 0.3)
                    .with(Bound::Target, "valence", 0.5),
            )
            .with_mood(
                &["romantic", "dreamy"],
                AudioTargets::default()
                    .with(Bound::Target, "valence", 0.6)
                    .with(Bound::Target, "energy", 0.4),
            )
            .with_scene(
                SceneCategory::Study,
                ScenePreset {
                    seed_genres: strings(&["ambient", "chill"]),
                    search_genre: Some("lofi".to_string()),
                    artists: strings(&[
                        "Nujabes",
                        "Jinsang",
                        "Idealism",
                        "Tomppabeats",
                        "Kupla",
                        "Philanthrope",
                        "Brian Eno",
                        "Ólafur Arnalds",
                    ]),
                    targets: AudioTargets::default()
                        .with(Bound::Target, "energy", 0.2)
                        .with(Bound::Max, "energy", 0.4)
                        .with(Bound::Target, "tempo", 85.0)
                        .with(Bound::Max, "tempo", 100.0)
                        .with(Bound::Max, "danceability", 0.5)
                        .with(Bound::Min, "instrumentalness", 0.5),
                },
            )
            .with_scene(
                SceneCategory::Nature,
                ScenePreset {
                    seed_genres: strings(&["acoustic", "folk"]),
                    search_genre: Some("acoustic".to_string()),
                    artists: strings(&["Bon Iver", "Fleet Foxes", "Iron & Wine", "José González"]),
                    targets: AudioTargets::default()
                        .with(Bound::Target, "energy", 0.35)
                        .with(Bound::Max, "energy", 0.6)
                        .with(Bound::Min, "acousticness", 0.5)
                        .with(Bound::Target, "valence", 0.5),
                },
            )
    }
}
