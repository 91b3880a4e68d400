use std::path::Path;

use tabled::Table;

use crate::{cli::session, success, utils, vibe::PopularityPolicy, warning};

pub async fn candidates(vibe_path: &Path, policy: PopularityPolicy, seed: Option<u64>) {
    let vibe = session::load_vibe(vibe_path).await;
    let list = session::select_tracks(&vibe, policy, seed).await;

    let table = Table::new(utils::track_table_rows(list.tracks()));
    println!("{}\n", table);

    if list.shortfall() > 0 {
        warning!(
            "{} of {} tracks found ({} short)",
            list.len(),
            list.requested(),
            list.shortfall()
        );
    } else {
        success!("{} {} tracks selected", list.len(), policy);
    }
}
