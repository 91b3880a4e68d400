use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use thiserror::Error;

use crate::{
    info,
    spotify::catalog::CatalogError,
    types::{CreatePlaylistRequest, CreatePlaylistResponse, TrackCandidate},
    vibe::VibeDescriptor,
    warning,
};

/// Tracks per add-items request accepted by the Web API.
pub const ADD_TRACKS_CHUNK: usize = 100;
/// Largest base64-encoded cover the Web API accepts.
pub const MAX_COVER_BASE64_BYTES: usize = 256 * 1024;

const MAX_NAME_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("no tracks to add to the playlist")]
    NoTracks,
    #[error("cover image is {0} bytes encoded, the limit is 262144")]
    CoverTooLarge(usize),
    #[error("cover image is not a base64 encoded JPEG")]
    InvalidCover,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// The playlist endpoints materialization needs.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError>;

    /// Appends `uris` in the given order and returns the snapshot id.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<String, CatalogError>;

    async fn upload_cover(&self, playlist_id: &str, jpeg_base64: &str) -> Result<(), CatalogError>;
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistOptions {
    pub name: Option<String>,
    pub public: bool,
    pub cover_jpeg_base64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedPlaylist {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub track_count: usize,
    pub cover_uploaded: bool,
}

pub struct PlaylistMaterializer<'a, S: PlaylistService + ?Sized> {
    service: &'a S,
    user_id: String,
}

impl<'a, S: PlaylistService + ?Sized> PlaylistMaterializer<'a, S> {
    pub fn new(service: &'a S, user_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: user_id.into(),
        }
    }

    /// Creates a playlist holding exactly `tracks`, in order.
    ///
    /// The cover is validated before anything is created. A rejected cover
    /// upload after the tracks were added only logs a warning: the playlist
    /// itself is complete at that point.
    pub async fn materialize(
        &self,
        tracks: &[TrackCandidate],
        vibe: &VibeDescriptor,
        options: &PlaylistOptions,
    ) -> Result<MaterializedPlaylist, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::NoTracks);
        }
        if let Some(cover) = &options.cover_jpeg_base64 {
            validate_cover(cover)?;
        }

        let name = options
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| truncate_chars(name, MAX_NAME_CHARS))
            .unwrap_or_else(|| playlist_name(vibe));

        let request = CreatePlaylistRequest {
            name,
            description: playlist_description(vibe),
            public: options.public,
            collaborative: false,
        };
        let created = self
            .service
            .create_playlist(&self.user_id, &request)
            .await?;
        info!("Created playlist '{}' ({})", created.name, created.id);

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        for chunk in uris.chunks(ADD_TRACKS_CHUNK) {
            self.service.add_tracks(&created.id, chunk).await?;
        }

        let mut cover_uploaded = false;
        if let Some(cover) = &options.cover_jpeg_base64 {
            match self.service.upload_cover(&created.id, cover).await {
                Ok(()) => cover_uploaded = true,
                Err(e) => warning!("Cover upload for '{}' failed: {}", created.name, e),
            }
        }

        Ok(MaterializedPlaylist {
            id: created.id,
            name: created.name,
            url: created.external_urls.spotify,
            track_count: uris.len(),
            cover_uploaded,
        })
    }
}

/// Base64-encodes raw JPEG bytes for upload.
pub fn encode_cover(jpeg: &[u8]) -> Result<String, PlaylistError> {
    let encoded = STANDARD.encode(jpeg);
    validate_cover(&encoded)?;
    Ok(encoded)
}

/// Checks the encoded size limit and the JPEG start-of-image marker.
pub fn validate_cover(jpeg_base64: &str) -> Result<(), PlaylistError> {
    let encoded = jpeg_base64.trim();
    if encoded.len() > MAX_COVER_BASE64_BYTES {
        return Err(PlaylistError::CoverTooLarge(encoded.len()));
    }
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| PlaylistError::InvalidCover)?;
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return Err(PlaylistError::InvalidCover);
    }
    Ok(())
}

/// "<Landmark> <Genre> Vibes" or "<Mood> <Genre> Vibes".
pub fn playlist_name(vibe: &VibeDescriptor) -> String {
    let genre = title_case(vibe.primary_genre());
    let lead = vibe
        .landmark
        .as_deref()
        .or(vibe.mood.as_deref())
        .map(str::trim)
        .filter(|lead| !lead.is_empty())
        .map(title_case);

    let name = match lead {
        Some(lead) => format!("{} {} Vibes", lead, genre),
        None => format!("{} Vibes", genre),
    };
    truncate_chars(&name, MAX_NAME_CHARS)
}

pub fn playlist_description(vibe: &VibeDescriptor) -> String {
    let mut parts = Vec::new();
    if let Some(mood) = vibe.mood.as_deref().filter(|m| !m.trim().is_empty()) {
        parts.push(format!("{} mood", mood.trim()));
    }
    parts.push(vibe.genres.join(", "));
    if !vibe.keywords.is_empty() {
        parts.push(vibe.keywords.join(", "));
    }

    let description = format!("Made by vibelist from a photo: {}", parts.join(" | "));
    truncate_chars(&description, MAX_DESCRIPTION_CHARS)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
