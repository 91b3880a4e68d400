use std::{path::Path, sync::Arc};

use crate::{
    cli::session, info,
    vibe::{LookupTables, VibeQueryPlanner},
};

pub async fn plan(vibe_path: &Path) {
    let vibe = session::load_vibe(vibe_path).await;
    let plan = VibeQueryPlanner::new(Arc::new(LookupTables::builtin())).plan(&vibe);

    info!(
        "Genres: {} | mood: {} | scene: {}",
        vibe.genres.join(", "),
        vibe.mood.as_deref().unwrap_or("-"),
        vibe.scene_category.map(|s| s.key()).unwrap_or("-")
    );
    if let Some(landmark) = &plan.landmark {
        info!("Landmark: {} ({} anthems)", landmark.query_name, landmark.anthems.len());
    }

    println!();
    for (i, directive) in plan.directives.iter().enumerate() {
        println!("{:>3}. {}", i + 1, directive);
    }

    println!("\nBackfill:");
    for query in &plan.fallback_queries {
        println!("     {}", query);
    }
}
