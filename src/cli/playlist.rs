use std::path::{Path, PathBuf};

use crate::{
    cli::session,
    config, error, info,
    spotify::{PlaylistMaterializer, PlaylistOptions, playlist::encode_cover},
    success,
    vibe::PopularityPolicy,
};

pub async fn playlist(
    vibe_path: &Path,
    policy: PopularityPolicy,
    name: Option<String>,
    cover: Option<PathBuf>,
    public: bool,
) {
    let user_id = match config::spotify_user() {
        Ok(user_id) => user_id,
        Err(e) => error!("{}", e),
    };

    let cover_jpeg_base64 = match cover {
        Some(path) => {
            let bytes = match async_fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => error!("Cannot read cover {}: {}", path.display(), e),
            };
            match encode_cover(&bytes) {
                Ok(encoded) => Some(encoded),
                Err(e) => error!("{}", e),
            }
        }
        None => None,
    };

    let vibe = session::load_vibe(vibe_path).await;
    let list = session::select_tracks(&vibe, policy, None).await;
    info!("Selected {} tracks, creating playlist", list.len());

    let client = session::spotify_client().await;
    let options = PlaylistOptions {
        name,
        public,
        cover_jpeg_base64,
    };

    match PlaylistMaterializer::new(&client, user_id)
        .materialize(list.tracks(), &vibe, &options)
        .await
    {
        Ok(created) => success!(
            "Playlist '{}' created with {} tracks {}",
            created.name,
            created.track_count,
            created.url.unwrap_or_default()
        ),
        Err(e) => error!("Failed to create playlist: {}", e),
    }
}
