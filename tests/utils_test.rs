use std::path::PathBuf;

use vibelist::utils::*;
use vibelist::vibe::{Energy, KeywordSceneClassifier, SceneCategory, SceneClassifier, Tempo};

mod common;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // SHA-256 digest is 32 bytes, 43 characters unpadded base64
    assert_eq!(challenge.len(), 43);

    // Should be deterministic
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_code_challenge_known_vector() {
    // base64url(sha256(verifier)) computed with openssl
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mJ92K1ejTO_1sYp8s_2JMXC1ikMKgA");
    assert_eq!(challenge, "q7X-89G9ZDQnN84jjVv09xWqs4K5OTfA69QrlArjhZE");
}

#[test]
fn test_words() {
    assert_eq!(words("Don't Stop Me Now!"), vec!["don't", "stop", "me", "now"]);
    assert_eq!(words("  --  "), Vec::<String>::new());
    assert_eq!(words("'quoted'"), vec!["quoted"]);
}

#[test]
fn test_contains_phrase_whole_words_only() {
    assert!(contains_phrase("Happy Together", "happy"));
    assert!(contains_phrase("Fight! Blue Devils, Fight!", "blue devils"));
    assert!(contains_phrase("Duke Fight Song", "DUKE"));

    // substrings inside words do not count
    assert!(!contains_phrase("Unhappy Ending", "happy"));
    assert!(!contains_phrase("Happiness", "happy"));

    // words must be contiguous
    assert!(!contains_phrase("Blue Skies, Red Devils", "blue devils"));

    // empty needle never matches
    assert!(!contains_phrase("Anything", ""));
}

#[test]
fn test_normalize_phrase() {
    assert_eq!(normalize_phrase("  Duke   University "), "duke university");
    assert_eq!(normalize_phrase("On, Wisconsin!"), "on wisconsin");
}

#[test]
fn test_genre_slug() {
    assert_eq!(genre_slug("Hip Hop"), "hip-hop");
    assert_eq!(genre_slug("R&B"), "r-n-b");
    assert_eq!(genre_slug("lofi"), "chill");
    assert_eq!(genre_slug("Lo-Fi"), "chill");
    assert_eq!(genre_slug(" indie rock "), "indie-rock");
}

#[test]
fn test_track_table_rows() {
    let tracks = vec![
        common::track("a", "First", "Alpha", 80, true),
        common::track("b", "Second", "Beta", 20, false),
    ];

    let rows = track_table_rows(&tracks);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].position, 1);
    assert_eq!(rows[0].title, "First");
    assert_eq!(rows[0].preview, "yes");
    assert_eq!(rows[1].position, 2);
    assert_eq!(rows[1].artists, "Beta");
    assert_eq!(rows[1].preview, "-");
}

fn temp_vibe_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vibelist-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_load_vibe_file_applies_defaults() {
    let path = temp_vibe_file(
        "defaults",
        r#"{
            "genres": [],
            "mood": "  happy ",
            "energy": "HIGH",
            "tempo": "something odd",
            "keywords": ["summer", "", "Summer", "beach"]
        }"#,
    );

    let vibe = load_vibe_file(&path, &KeywordSceneClassifier::default())
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(vibe.genres, vec!["pop"]);
    assert_eq!(vibe.mood.as_deref(), Some("happy"));
    assert_eq!(vibe.energy, Energy::High);
    assert_eq!(vibe.tempo, Tempo::Moderate);
    assert_eq!(vibe.keywords, vec!["summer", "beach"]);
    assert_eq!(vibe.scene_category, None);
}

#[tokio::test]
async fn test_load_vibe_file_treats_null_as_missing() {
    let path = temp_vibe_file(
        "nulls",
        r#"{
            "genres": null,
            "mood": null,
            "energy": null,
            "tempo": null,
            "keywords": null,
            "artists": null,
            "landmark": null,
            "scene_category": null
        }"#,
    );

    let vibe = load_vibe_file(&path, &KeywordSceneClassifier::default())
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(vibe.genres, vec!["pop"]);
    assert_eq!(vibe.mood, None);
    assert_eq!(vibe.energy, Energy::Medium);
    assert_eq!(vibe.tempo, Tempo::Moderate);
    assert!(vibe.keywords.is_empty());
    assert!(vibe.artists.is_empty());
    assert!(vibe.validate().is_ok());
}

#[test]
fn test_scene_classifier_falls_back_to_primary_genre() {
    let classifier = KeywordSceneClassifier::default();
    let genres = |list: &[&str]| list.iter().map(|g| g.to_string()).collect::<Vec<_>>();

    assert_eq!(
        classifier.classify_scene(None, &genres(&["Acoustic", "rock"])),
        Some(SceneCategory::Nature)
    );
    assert_eq!(
        classifier.classify_scene(Some("a crowded stadium"), &genres(&["lofi"])),
        Some(SceneCategory::Study)
    );
    // only the first genre counts as a hint
    assert_eq!(
        classifier.classify_scene(None, &genres(&["rock", "folk"])),
        None
    );
    // a description match wins over the genre hint
    assert_eq!(
        classifier.classify_scene(Some("hiking up a mountain"), &genres(&["lofi"])),
        Some(SceneCategory::Nature)
    );
}

#[tokio::test]
async fn test_load_vibe_file_classifies_scene() {
    let path = temp_vibe_file(
        "scene",
        r#"{
            "genres": ["indie"],
            "description": "A student studying late in a quiet library"
        }"#,
    );

    let vibe = load_vibe_file(&path, &KeywordSceneClassifier::default())
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(vibe.scene_category, Some(SceneCategory::Study));
}

#[tokio::test]
async fn test_load_vibe_file_keeps_given_scene() {
    let path = temp_vibe_file(
        "given-scene",
        r#"{
            "genres": ["folk"],
            "scene_category": "study",
            "description": "A misty forest trail"
        }"#,
    );

    let vibe = load_vibe_file(&path, &KeywordSceneClassifier::default())
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(vibe.scene_category, Some(SceneCategory::Study));
}

#[tokio::test]
async fn test_load_vibe_file_rejects_bad_json() {
    let path = temp_vibe_file("broken", "{ not json");

    let result = load_vibe_file(&path, &KeywordSceneClassifier::default()).await;
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(VibeFileError::Parse(_))));
}

#[tokio::test]
async fn test_load_vibe_file_missing() {
    let path = std::env::temp_dir().join("vibelist-does-not-exist.json");
    let result = load_vibe_file(&path, &KeywordSceneClassifier::default()).await;
    assert!(matches!(result, Err(VibeFileError::Io(_))));
}
