use std::sync::Mutex;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use vibelist::{
    spotify::{
        CatalogError, PlaylistError, PlaylistMaterializer, PlaylistOptions, PlaylistService,
        playlist::{self, MAX_COVER_BASE64_BYTES},
    },
    types::{CreatePlaylistRequest, CreatePlaylistResponse, ExternalUrls},
    vibe::VibeDescriptor,
};

mod common;

#[derive(Default)]
struct MockPlaylists {
    created: Mutex<Vec<(String, CreatePlaylistRequest)>>,
    batches: Mutex<Vec<Vec<String>>>,
    covers: Mutex<Vec<String>>,
    cover_error: Option<CatalogError>,
    create_error: Option<CatalogError>,
}

#[async_trait]
impl PlaylistService for MockPlaylists {
    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        self.created
            .lock()
            .unwrap()
            .push((user_id.to_string(), request.clone()));
        Ok(CreatePlaylistResponse {
            id: "pl1".to_string(),
            name: request.name.clone(),
            description: Some(request.description.clone()),
            public: Some(request.public),
            external_urls: ExternalUrls {
                spotify: Some("https://open.spotify.com/playlist/pl1".to_string()),
            },
        })
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<String, CatalogError> {
        assert_eq!(playlist_id, "pl1");
        self.batches.lock().unwrap().push(uris.to_vec());
        Ok("snapshot".to_string())
    }

    async fn upload_cover(&self, playlist_id: &str, jpeg_base64: &str) -> Result<(), CatalogError> {
        assert_eq!(playlist_id, "pl1");
        if let Some(err) = &self.cover_error {
            return Err(err.clone());
        }
        self.covers.lock().unwrap().push(jpeg_base64.to_string());
        Ok(())
    }
}

fn vibe() -> VibeDescriptor {
    let mut vibe = VibeDescriptor::new(vec!["indie pop".to_string(), "folk".to_string()]);
    vibe.mood = Some("dreamy".to_string());
    vibe.keywords = vec!["sunset".to_string(), "beach".to_string()];
    vibe.with_defaults()
}

fn jpeg_cover() -> String {
    STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'])
}

#[tokio::test]
async fn test_tracks_are_added_in_chunks_and_order() {
    let service = MockPlaylists::default();
    let tracks = common::spread("t", 230, 0, 100);

    let playlist = PlaylistMaterializer::new(&service, "user 1")
        .materialize(&tracks, &vibe(), &PlaylistOptions::default())
        .await
        .unwrap();

    assert_eq!(playlist.id, "pl1");
    assert_eq!(playlist.track_count, 230);
    assert_eq!(
        playlist.url.as_deref(),
        Some("https://open.spotify.com/playlist/pl1")
    );
    assert!(!playlist.cover_uploaded);

    let batches = service.batches.lock().unwrap().clone();
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 30]);

    let added: Vec<String> = batches.into_iter().flatten().collect();
    let expected: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
    assert_eq!(added, expected);

    let created = service.created.lock().unwrap();
    assert_eq!(created[0].0, "user 1");
    assert!(!created[0].1.public);
}

#[tokio::test]
async fn test_name_and_description_from_vibe() {
    let service = MockPlaylists::default();

    let playlist = PlaylistMaterializer::new(&service, "u")
        .materialize(
            &common::spread("t", 3, 0, 100),
            &vibe(),
            &PlaylistOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(playlist.name, "Dreamy Indie Pop Vibes");
    let created = service.created.lock().unwrap();
    assert_eq!(
        created[0].1.description,
        "Made by vibelist from a photo: dreamy mood | indie pop, folk | sunset, beach"
    );
}

#[tokio::test]
async fn test_explicit_name_and_public_flag() {
    let service = MockPlaylists::default();
    let options = PlaylistOptions {
        name: Some("  Road Trip  ".to_string()),
        public: true,
        cover_jpeg_base64: None,
    };

    let playlist = PlaylistMaterializer::new(&service, "u")
        .materialize(&common::spread("t", 3, 0, 100), &vibe(), &options)
        .await
        .unwrap();

    assert_eq!(playlist.name, "Road Trip");
    assert!(service.created.lock().unwrap()[0].1.public);
}

#[test]
fn test_playlist_name_prefers_landmark() {
    let mut v = vibe();
    v.landmark = Some("duke university".to_string());
    assert_eq!(playlist::playlist_name(&v), "Duke University Indie Pop Vibes");

    let plain = VibeDescriptor::new(vec!["jazz".to_string()]).with_defaults();
    assert_eq!(playlist::playlist_name(&plain), "Jazz Vibes");
}

#[tokio::test]
async fn test_empty_track_list_is_rejected() {
    let service = MockPlaylists::default();

    let result = PlaylistMaterializer::new(&service, "u")
        .materialize(&[], &vibe(), &PlaylistOptions::default())
        .await;

    assert!(matches!(result, Err(PlaylistError::NoTracks)));
    assert!(service.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_cover_is_rejected_before_creation() {
    let service = MockPlaylists::default();
    let options = PlaylistOptions {
        cover_jpeg_base64: Some("A".repeat(MAX_COVER_BASE64_BYTES + 4)),
        ..Default::default()
    };

    let result = PlaylistMaterializer::new(&service, "u")
        .materialize(&common::spread("t", 3, 0, 100), &vibe(), &options)
        .await;

    assert!(matches!(result, Err(PlaylistError::CoverTooLarge(_))));
    assert!(service.created.lock().unwrap().is_empty());
    assert!(service.batches.lock().unwrap().is_empty());
}

#[test]
fn test_cover_validation() {
    assert!(playlist::validate_cover(&jpeg_cover()).is_ok());
    // PNG signature
    let png = STANDARD.encode([0x89, b'P', b'N', b'G', 0x0D, 0x0A]);
    assert!(matches!(
        playlist::validate_cover(&png),
        Err(PlaylistError::InvalidCover)
    ));
    assert!(matches!(
        playlist::validate_cover("not base64!"),
        Err(PlaylistError::InvalidCover)
    ));

    let encoded = playlist::encode_cover(&[0xFF, 0xD8, 0xFF, 0xDB]).unwrap();
    assert_eq!(STANDARD.decode(encoded).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xDB]);
}

#[tokio::test]
async fn test_cover_is_uploaded_after_tracks() {
    let service = MockPlaylists::default();
    let options = PlaylistOptions {
        cover_jpeg_base64: Some(jpeg_cover()),
        ..Default::default()
    };

    let playlist = PlaylistMaterializer::new(&service, "u")
        .materialize(&common::spread("t", 3, 0, 100), &vibe(), &options)
        .await
        .unwrap();

    assert!(playlist.cover_uploaded);
    assert_eq!(service.covers.lock().unwrap().as_slice(), &[jpeg_cover()]);
}

#[tokio::test]
async fn test_cover_failure_keeps_playlist() {
    let service = MockPlaylists {
        cover_error: Some(CatalogError::Status(StatusCode::PAYLOAD_TOO_LARGE)),
        ..Default::default()
    };
    let options = PlaylistOptions {
        cover_jpeg_base64: Some(jpeg_cover()),
        ..Default::default()
    };

    let playlist = PlaylistMaterializer::new(&service, "u")
        .materialize(&common::spread("t", 5, 0, 100), &vibe(), &options)
        .await
        .unwrap();

    assert!(!playlist.cover_uploaded);
    assert_eq!(playlist.track_count, 5);
}

#[tokio::test]
async fn test_create_failure_is_returned() {
    let service = MockPlaylists {
        create_error: Some(CatalogError::Unauthorized(StatusCode::UNAUTHORIZED)),
        ..Default::default()
    };

    let result = PlaylistMaterializer::new(&service, "u")
        .materialize(
            &common::spread("t", 5, 0, 100),
            &vibe(),
            &PlaylistOptions::default(),
        )
        .await;

    assert!(matches!(
        result,
        Err(PlaylistError::Catalog(CatalogError::Unauthorized(_)))
    ));
    assert!(service.batches.lock().unwrap().is_empty());
}
