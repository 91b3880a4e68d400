use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::vibe::scene::SceneClassifier;

pub const DEFAULT_GENRE: &str = "pop";
pub const MAX_GENRES: usize = 5;
pub const MAX_KEYWORDS: usize = 5;
pub const MAX_ARTISTS: usize = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    #[default]
    Medium,
    High,
}

impl Energy {
    /// Unknown labels fall back to `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" | "calm" | "mellow" => Energy::Low,
            "high" | "intense" | "energetic" => Energy::High,
            _ => Energy::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Energy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label: Option<String> = Option::deserialize(deserializer)?;
        Ok(label.as_deref().map(Energy::from_label).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tempo {
    Slow,
    #[default]
    Moderate,
    Fast,
}

impl Tempo {
    /// Unknown labels fall back to `Moderate`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "slow" => Tempo::Slow,
            "fast" | "quick" => Tempo::Fast,
            _ => Tempo::Moderate,
        }
    }
}

impl<'de> Deserialize<'de> for Tempo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label: Option<String> = Option::deserialize(deserializer)?;
        Ok(label.as_deref().map(Tempo::from_label).unwrap_or_default())
    }
}

/// Scene tags that switch the planner to a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneCategory {
    Study,
    Nature,
}

impl SceneCategory {
    pub fn key(&self) -> &'static str {
        match self {
            SceneCategory::Study => "study",
            SceneCategory::Nature => "nature",
        }
    }

    /// Maps a free-form tag such as `"study/classroom"` to a category.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if ["study", "classroom", "library", "ambient"]
            .iter()
            .any(|k| label.contains(k))
        {
            Some(SceneCategory::Study)
        } else if ["nature", "outdoor", "forest", "mountain"]
            .iter()
            .any(|k| label.contains(k))
        {
            Some(SceneCategory::Nature)
        } else {
            None
        }
    }
}

/// Reads `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_scene<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SceneCategory>, D::Error> {
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(SceneCategory::from_label))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityPolicy {
    Mainstream,
    Indie,
    #[default]
    Mixed,
}

impl FromStr for PopularityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainstream" | "popular" => Ok(PopularityPolicy::Mainstream),
            "indie" | "underground" => Ok(PopularityPolicy::Indie),
            "mixed" | "balanced" => Ok(PopularityPolicy::Mixed),
            other => Err(format!(
                "unknown popularity policy '{}', expected mainstream, indie or mixed",
                other
            )),
        }
    }
}

impl fmt::Display for PopularityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PopularityPolicy::Mainstream => "mainstream",
            PopularityPolicy::Indie => "indie",
            PopularityPolicy::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

/// Mood, genre and artist metadata derived from an uploaded image.
///
/// Deserialized from the analysis step's JSON. Call [`VibeDescriptor::with_defaults`]
/// at the boundary before handing it to the pipeline: it trims values, enforces
/// the list bounds and substitutes `["pop"]` for a missing genre list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeDescriptor {
    /// Ordered, strongest match first.
    #[serde(deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    pub mood: Option<String>,
    pub energy: Energy,
    pub tempo: Tempo,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    /// Suggested artists, highest priority first.
    #[serde(deserialize_with = "null_as_default")]
    pub artists: Vec<String>,
    pub landmark: Option<String>,
    #[serde(deserialize_with = "lenient_scene")]
    pub scene_category: Option<SceneCategory>,
    /// Free-text description of the photo.
    pub description: Option<String>,
}

impl VibeDescriptor {
    pub fn new(genres: Vec<String>) -> Self {
        Self {
            genres,
            ..Default::default()
        }
    }

    pub fn with_defaults(mut self) -> Self {
        self.genres = clean_list(self.genres, MAX_GENRES);
        if self.genres.is_empty() {
            self.genres.push(DEFAULT_GENRE.to_string());
        }
        self.keywords = clean_list(self.keywords, MAX_KEYWORDS);
        self.artists = clean_list(self.artists, MAX_ARTISTS);
        self.mood = clean_opt(self.mood);
        self.landmark = clean_opt(self.landmark);
        self.description = clean_opt(self.description);
        self
    }

    /// Fills `scene_category` from the classifier when the analysis did not
    /// provide one.
    pub fn classify_scene(mut self, classifier: &dyn SceneClassifier) -> Self {
        if self.scene_category.is_none() {
            self.scene_category =
                classifier.classify_scene(self.description.as_deref(), &self.genres);
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.genres.iter().all(|g| g.trim().is_empty()) {
            return Err("vibe descriptor has no genres".to_string());
        }
        Ok(())
    }

    pub fn primary_genre(&self) -> &str {
        self.genres
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_GENRE)
    }

    pub fn mood_word(&self) -> Option<&str> {
        self.mood.as_deref().filter(|m| !m.is_empty())
    }
}

fn clean_list(values: Vec<String>, max: usize) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() || cleaned.iter().any(|c| c.eq_ignore_ascii_case(&value)) {
            continue;
        }
        cleaned.push(value);
        if cleaned.len() == max {
            break;
        }
    }
    cleaned
}

fn clean_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
