//! Scene classification.
//!
//! The analysis step describes the photo in free text. Whether that text means
//! "someone studying in a classroom" is a fuzzy call, so it lives behind
//! [`SceneClassifier`] and the pipeline only ever sees the resulting
//! [`SceneCategory`].

use crate::vibe::descriptor::SceneCategory;

pub trait SceneClassifier: Send + Sync {
    fn classify_scene(&self, description: Option<&str>, genres: &[String]) -> Option<SceneCategory>;
}

/// Substring heuristic over the description, with genre hints as a fallback.
#[derive(Debug, Clone)]
pub struct KeywordSceneClassifier {
    rules: Vec<(SceneCategory, Vec<String>)>,
    genre_hints: Vec<(SceneCategory, Vec<String>)>,
}

impl KeywordSceneClassifier {
    pub fn new(
        rules: Vec<(SceneCategory, Vec<String>)>,
        genre_hints: Vec<(SceneCategory, Vec<String>)>,
    ) -> Self {
        Self { rules, genre_hints }
    }
}

impl Default for KeywordSceneClassifier {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self::new(
            vec![
                (
                    SceneCategory::Study,
                    words(&[
                        "classroom",
                        "lecture hall",
                        "studying",
                        "study session",
                        "library",
                        "desk with books",
                        "homework",
                        "notebook",
                    ]),
                ),
                (
                    SceneCategory::Nature,
                    words(&["forest", "mountain", "hiking", "waterfall", "meadow", "lake"]),
                ),
            ],
            vec![
                (SceneCategory::Study, words(&["lofi", "lo-fi", "study"])),
                (SceneCategory::Nature, words(&["folk", "acoustic"])),
            ],
        )
    }
}

impl SceneClassifier for KeywordSceneClassifier {
    fn classify_scene(&self, description: Option<&str>, genres: &[String]) -> Option<SceneCategory> {
        if let Some(description) = description {
            let description = description.to_lowercase();
            for (category, needles) in &self.rules {
                if needles.iter().any(|n| description.contains(n.as_str())) {
                    return Some(*category);
                }
            }
        }

        // Only the primary genre is trusted as a scene hint.
        let primary = genres.first()?.to_lowercase();
        self.genre_hints
            .iter()
            .find(|(_, hints)| hints.iter().any(|h| primary == *h))
            .map(|(category, _)| *category)
    }
}
