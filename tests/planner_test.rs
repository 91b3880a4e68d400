use std::sync::Arc;

use vibelist::vibe::{
    AudioTargets, Bound, Energy, LandmarkEntry, LookupTables, QueryDirective, SceneCategory,
    Tempo, VibeDescriptor, VibeQueryPlanner,
};

fn planner() -> VibeQueryPlanner {
    VibeQueryPlanner::new(Arc::new(LookupTables::builtin()))
}

fn vibe(genres: &[&str]) -> VibeDescriptor {
    VibeDescriptor::new(genres.iter().map(|g| g.to_string()).collect()).with_defaults()
}

fn keyword_searches(plan: &vibelist::vibe::QueryPlan) -> Vec<String> {
    plan.keyword_searches().map(str::to_string).collect()
}

#[test]
fn test_recommendation_seed_comes_first() {
    let mut v = vibe(&["pop"]);
    v.artists = vec!["Dua Lipa".to_string()];

    let plan = planner().plan(&v);

    assert!(matches!(
        plan.directives.first(),
        Some(QueryDirective::RecommendationSeed(_))
    ));
    assert!(matches!(
        plan.directives.get(1),
        Some(QueryDirective::ArtistSearch { name }) if name == "Dua Lipa"
    ));
}

#[test]
fn test_generic_energy_tempo_and_mood_targets() {
    let mut v = vibe(&["pop", "dance"]);
    v.mood = Some("happy".to_string());
    v.energy = Energy::High;
    v.tempo = Tempo::Fast;

    let plan = planner().plan(&v);
    let seed = plan.recommendation_seed().unwrap();

    assert_eq!(seed.genres, vec!["pop", "dance"]);
    assert!(seed.artist_ids.is_empty());
    assert_eq!(seed.targets.get(Bound::Target, "energy"), Some(0.8));
    assert_eq!(seed.targets.get(Bound::Min, "energy"), Some(0.6));
    assert_eq!(seed.targets.get(Bound::Target, "tempo"), Some(140.0));
    assert_eq!(seed.targets.get(Bound::Min, "tempo"), Some(120.0));
    assert_eq!(seed.targets.get(Bound::Target, "valence"), Some(0.8));
    assert_eq!(seed.targets.get(Bound::Target, "danceability"), Some(0.7));

    assert_eq!(
        keyword_searches(&plan),
        vec![
            "pop happy",
            "dance happy",
            "energetic pop",
            "upbeat pop",
            "energetic dance",
            "upbeat dance",
        ]
    );
    assert_eq!(
        plan.fallback_queries,
        vec!["pop", "popular pop", "genre:\"pop\""]
    );
    assert!(plan.landmark.is_none());
}

#[test]
fn test_mood_targets_override_energy() {
    let mut v = vibe(&["indie"]);
    v.mood = Some("calm".to_string());
    v.energy = Energy::High;

    let seed = planner().plan(&v).recommendation_seed().cloned().unwrap();

    // calm sets target_energy; the high-energy floor stays
    assert_eq!(seed.targets.get(Bound::Target, "energy"), Some(0.3));
    assert_eq!(seed.targets.get(Bound::Min, "energy"), Some(0.6));
}

#[test]
fn test_seed_genres_are_slugged_and_capped() {
    let v = vibe(&["R&B", "lofi", "jazz"]);

    let seed = planner().plan(&v).recommendation_seed().cloned().unwrap();

    assert_eq!(seed.genres, vec!["r-n-b", "chill"]);
}

#[test]
fn test_study_scene_overrides_genres_and_targets() {
    let mut v = vibe(&["metal", "punk"]);
    v.scene_category = Some(SceneCategory::Study);
    v.energy = Energy::High;
    v.tempo = Tempo::Fast;
    v.artists = vec!["Metallica".to_string()];

    let plan = planner().plan(&v);
    let seed = plan.recommendation_seed().unwrap();

    assert_eq!(seed.genres, vec!["ambient", "chill"]);
    assert!(seed.targets.get(Bound::Target, "energy").unwrap() <= 0.4);
    assert_eq!(seed.targets.get(Bound::Max, "energy"), Some(0.4));
    assert_eq!(seed.targets.get(Bound::Target, "tempo"), Some(85.0));
    assert_eq!(seed.targets.get(Bound::Max, "tempo"), Some(100.0));
    assert_eq!(seed.targets.get(Bound::Max, "danceability"), Some(0.5));
    assert_eq!(seed.targets.get(Bound::Min, "instrumentalness"), Some(0.5));
    // the generic fast-tempo floor is not applied
    assert_eq!(seed.targets.get(Bound::Min, "tempo"), None);

    // curated artists take the priority slots
    let artists: Vec<&str> = plan.artist_searches().collect();
    assert_eq!(artists.len(), 5);
    assert_eq!(artists[0], "Nujabes");
    assert!(!artists.contains(&"Metallica"));

    // the scene sub-genre leads searches and backfill
    assert_eq!(plan.fallback_queries[0], "lofi");
    assert!(keyword_searches(&plan).contains(&"artist:\"Metallica\"".to_string()));
}

#[test]
fn test_nature_scene_preset() {
    let mut v = vibe(&["rock"]);
    v.scene_category = Some(SceneCategory::Nature);
    v.artists = vec!["Radiohead".to_string()];

    let plan = planner().plan(&v);
    let seed = plan.recommendation_seed().unwrap();

    assert_eq!(seed.genres, vec!["acoustic", "folk"]);
    assert_eq!(seed.targets.get(Bound::Target, "energy"), Some(0.35));
    assert_eq!(seed.targets.get(Bound::Max, "energy"), Some(0.6));
    assert_eq!(seed.targets.get(Bound::Min, "acousticness"), Some(0.5));
    assert_eq!(seed.targets.get(Bound::Target, "tempo"), None);

    let artists: Vec<&str> = plan.artist_searches().collect();
    assert_eq!(
        artists,
        vec!["Bon Iver", "Fleet Foxes", "Iron & Wine", "José González", "Radiohead"]
    );
    assert_eq!(plan.fallback_queries[0], "acoustic");
}

#[test]
fn test_landmark_queries_lead_keyword_searches() {
    let mut v = vibe(&["rock"]);
    v.landmark = Some("Duke University".to_string());

    let plan = planner().plan(&v);
    let landmark = plan.landmark.clone().unwrap();
    assert_eq!(landmark.key, "duke university");
    assert_eq!(landmark.query_name, "Duke University");

    let searches = keyword_searches(&plan);
    assert_eq!(
        &searches[..6],
        &[
            "\"Fight! Blue Devils, Fight!\"",
            "\"Blue and White\"",
            "\"Dear Old Duke\"",
            "Duke University fight song",
            "Duke University anthem",
            "Duke University song",
        ]
    );
}

#[test]
fn test_landmark_short_name_matches() {
    let mut v = vibe(&["rock"]);
    v.landmark = Some("Duke".to_string());

    let landmark = planner().plan(&v).landmark.unwrap();

    assert_eq!(landmark.key, "duke university");
    assert_eq!(landmark.query_name, "Duke");
}

#[test]
fn test_landmark_from_description() {
    let mut v = vibe(&["rock"]);
    v.description = Some("Fans in blue cheering for the Blue Devils at a night game".to_string());

    let landmark = planner().plan(&v).landmark.unwrap();

    assert_eq!(landmark.key, "duke university");
    assert_eq!(landmark.query_name, "Duke University");
}

#[test]
fn test_generic_landmark_word_matches_nothing() {
    let mut v = vibe(&["rock"]);
    v.landmark = Some("University".to_string());

    assert!(planner().plan(&v).landmark.is_none());
}

#[test]
fn test_unknown_landmark_is_ignored() {
    let mut v = vibe(&["rock"]);
    v.landmark = Some("Eiffel Tower".to_string());

    let plan = planner().plan(&v);

    assert!(plan.landmark.is_none());
    assert!(keyword_searches(&plan).iter().all(|q| !q.contains("fight song")));
}

#[test]
fn test_artist_and_search_bounds() {
    let mut v = vibe(&["pop", "rock"]);
    v.artists = (0..40).map(|i| format!("Artist {}", i)).collect();
    v.keywords = vec!["summer".to_string(), "beach".to_string()];
    v.mood = Some("happy".to_string());
    let v = v.with_defaults();
    assert_eq!(v.artists.len(), 25);

    let plan = planner().plan(&v);
    let searches = keyword_searches(&plan);

    assert_eq!(plan.artist_searches().count(), 5);
    assert_eq!(
        searches.iter().filter(|q| q.starts_with("artist:")).count(),
        15
    );
    assert!(searches.len() <= 25);
}

#[test]
fn test_max_searches_is_configurable() {
    let mut v = vibe(&["pop", "rock", "jazz"]);
    v.keywords = vec!["night".to_string(), "city".to_string()];
    v.mood = Some("sad".to_string());
    v.energy = Energy::Low;

    let plan = planner().with_max_searches(3).plan(&v);

    assert_eq!(keyword_searches(&plan).len(), 3);
}

#[test]
fn test_keyword_queries_are_unique() {
    let mut v = vibe(&["pop"]);
    v.keywords = vec!["happy".to_string()];
    v.mood = Some("happy".to_string());

    let searches = keyword_searches(&planner().plan(&v));

    // "pop happy" from the mood and from the keyword collapse into one
    assert_eq!(searches.iter().filter(|q| *q == "pop happy").count(), 1);
}

#[test]
fn test_substitute_tables() {
    let tables = LookupTables::empty()
        .with_landmark(LandmarkEntry {
            name: "Test Institute".to_string(),
            aliases: vec!["tti".to_string()],
            anthems: vec!["Go Testers".to_string()],
            terms: vec!["testers".to_string()],
        })
        .with_mood(
            &["happy"],
            AudioTargets::default().with(Bound::Target, "valence", 0.99),
        );
    let planner = VibeQueryPlanner::new(Arc::new(tables));

    let mut v = vibe(&["pop"]);
    v.mood = Some("happy".to_string());
    v.landmark = Some("TTI".to_string());

    let plan = planner.plan(&v);

    assert_eq!(plan.landmark.as_ref().unwrap().anthems, vec!["Go Testers"]);
    assert_eq!(
        plan.recommendation_seed()
            .unwrap()
            .targets
            .get(Bound::Target, "valence"),
        Some(0.99)
    );

    // no Duke entry in the substitute table
    let mut duke = vibe(&["pop"]);
    duke.landmark = Some("Duke University".to_string());
    assert!(planner.plan(&duke).landmark.is_none());
}

#[test]
fn test_directive_serialization() {
    let plan = planner().plan(&vibe(&["pop"]));
    let json = serde_json::to_value(&plan.directives).unwrap();

    assert_eq!(json[0]["kind"], "recommendation_seed");
    assert_eq!(json[0]["genres"][0], "pop");
    assert_eq!(json[0]["targets"]["target_energy"], 0.5);
}
