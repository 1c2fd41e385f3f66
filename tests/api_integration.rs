//! Integration tests for API endpoints.
//!
//! These tests run the full router against in-process catalog and
//! classifier fakes, so no network access or credentials are needed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use moodify::catalog::{CatalogError, CatalogItem, CatalogSearch, SearchRequest};
use moodify::classifier::{ClassifierError, EmotionClassifier, FaceAnalysis};
use moodify::config::AppConfig;
use moodify::playlist::CacheStats;
use moodify::server::{create_router, AppState};
use moodify::types::{
    HealthResponse, HealthStatus, InvalidateCacheResponse, InvalidationScope, ListMoodsResponse,
    RecommendResponse, ResolveMoodResponse, SelectPlaylistsResponse,
};
use moodify::{Emotion, MoodSource};

const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Catalog fake that counts searches and remembers the last query
struct FakeCatalog {
    items: Option<Vec<CatalogItem>>,
    calls: AtomicUsize,
    last_query: std::sync::Mutex<Option<String>>,
}

impl FakeCatalog {
    fn with_items(items: Vec<CatalogItem>) -> Arc<Self> {
        Arc::new(Self {
            items: Some(items),
            calls: AtomicUsize::new(0),
            last_query: std::sync::Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            items: None,
            calls: AtomicUsize::new(0),
            last_query: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<CatalogItem>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(request.query.clone());
        self.items
            .clone()
            .ok_or_else(|| CatalogError::Request("connection reset".to_string()))
    }
}

/// Classifier fake returning a fixed face, or failing when none is set
struct FakeClassifier {
    face: Option<FaceAnalysis>,
}

#[async_trait]
impl EmotionClassifier for FakeClassifier {
    async fn analyze(&self, _image: &[u8]) -> Result<Vec<FaceAnalysis>, ClassifierError> {
        self.face
            .clone()
            .map(|f| vec![f])
            .ok_or_else(|| ClassifierError::Service {
                status: 500,
                message: "model crashed".to_string(),
            })
    }
}

fn happy_face() -> FaceAnalysis {
    FaceAnalysis {
        dominant_emotion: "happy".to_string(),
        emotion: [("happy", 82.0), ("sad", 5.0), ("neutral", 10.0), ("angry", 3.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

fn playlists() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("Feel Good Pop", "https://open.spotify.com/playlist/p1"),
        CatalogItem::default(),
        CatalogItem::new("Sunny Day", "https://open.spotify.com/playlist/p2"),
    ]
}

fn create_server(catalog: Arc<FakeCatalog>, face: Option<FaceAnalysis>) -> TestServer {
    let state = AppState::with_services(
        AppConfig::default(),
        Arc::new(FakeClassifier { face }),
        catalog,
    );
    TestServer::new(create_router(state)).unwrap()
}

/// Helper to create msgpack bytes
fn msgpack_bytes<T: serde::Serialize>(value: &T) -> Bytes {
    Bytes::from(rmp_serde::to_vec_named(value).unwrap())
}

fn decode<T: serde::de::DeserializeOwned>(response: &axum_test::TestResponse) -> T {
    rmp_serde::from_slice(response.as_bytes()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_server(FakeCatalog::with_items(vec![]), None);

    let response = server.get("/api/v1/health").await;

    response.assert_status_ok();
    let content_type = response.headers().get("content-type");
    assert!(content_type.unwrap().to_str().unwrap().contains("msgpack"));

    // Default config carries no catalog credentials
    let health: HealthResponse = decode(&response);
    assert_eq!(health.status, HealthStatus::Degraded);
    assert!(!health.catalog_configured);
    assert!(health.uptime_secs < 60);
}

#[tokio::test]
async fn test_config_endpoint() {
    let server = create_server(FakeCatalog::with_items(vec![]), None);

    let response = server.get("/api/v1/config").await;

    response.assert_status_ok();
    assert!(!response.text().contains("client_secret"));
}

#[tokio::test]
async fn test_moods_endpoint() {
    let server = create_server(FakeCatalog::with_items(vec![]), None);

    let response = server.get("/api/v1/moods").await;

    response.assert_status_ok();
    let moods: ListMoodsResponse = decode(&response);
    assert_eq!(moods.moods.len(), 7);
    assert_eq!(moods.moods[0].id, "happy");
    assert_eq!(moods.moods[0].genre, "pop");
}

#[tokio::test]
async fn test_resolve_mood() {
    let server = create_server(FakeCatalog::with_items(vec![]), None);

    let response = server
        .post("/api/v1/mood/resolve")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({
            "scores": {"neutral": 60.0, "happy": 55.0, "sad": 5.0}
        })))
        .await;

    response.assert_status_ok();
    let resolved: ResolveMoodResponse = decode(&response);
    assert_eq!(resolved.label, Emotion::Neutral);
    assert!((resolved.confidence - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn test_resolve_mood_accepts_json() {
    let server = create_server(FakeCatalog::with_items(vec![]), None);

    let response = server
        .post("/api/v1/mood/resolve")
        .json(&serde_json::json!({
            "scores": {"fear": 45.0, "sad": 50.0},
            "dominant_emotion": "fear"
        }))
        .await;

    response.assert_status_ok();
    let resolved: ResolveMoodResponse = decode(&response);
    assert_eq!(resolved.label, Emotion::Sad);
}

#[tokio::test]
async fn test_resolve_mood_empty_scores() {
    let server = create_server(FakeCatalog::with_items(vec![]), None);

    let response = server
        .post("/api/v1/mood/resolve")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({ "scores": {} })))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = decode(&response);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_select_playlists_and_cache() {
    let catalog = FakeCatalog::with_items(playlists());
    let server = create_server(catalog.clone(), None);
    let body = msgpack_bytes(&serde_json::json!({ "mood": "happy", "language": "Korea" }));

    let first = server
        .post("/api/v1/playlists")
        .content_type("application/msgpack")
        .bytes(body.clone())
        .await;
    first.assert_status_ok();

    let selected: SelectPlaylistsResponse = decode(&first);
    assert!(!selected.is_default);
    assert_eq!(selected.playlists.len(), 2);
    assert_eq!(selected.playlists[0].name, "Feel Good Pop");
    assert_eq!(catalog.last_query().as_deref(), Some("pop k-pop"));

    let second = server
        .post("/api/v1/playlists")
        .content_type("application/msgpack")
        .bytes(body)
        .await;
    let again: SelectPlaylistsResponse = decode(&second);
    assert_eq!(again.playlists, selected.playlists);
    assert_eq!(catalog.calls(), 1);

    let stats: CacheStats = decode(&server.get("/api/v1/playlists/cache").await);
    assert_eq!(stats.entry_count, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn test_invalidate_cache_forces_fresh_search() {
    let catalog = FakeCatalog::with_items(playlists());
    let server = create_server(catalog.clone(), None);
    let body = msgpack_bytes(&serde_json::json!({ "mood": "sad" }));

    server
        .post("/api/v1/playlists")
        .content_type("application/msgpack")
        .bytes(body.clone())
        .await
        .assert_status_ok();

    let cleared = server.delete("/api/v1/playlists/cache").await;
    cleared.assert_status_ok();
    let cleared: InvalidateCacheResponse = decode(&cleared);
    assert_eq!(cleared.scope, InvalidationScope::All);
    assert_eq!(cleared.stats.entry_count, 0);

    server
        .post("/api/v1/playlists")
        .content_type("application/msgpack")
        .bytes(body)
        .await
        .assert_status_ok();
    assert_eq!(catalog.calls(), 2);
}

#[tokio::test]
async fn test_invalidate_single_key() {
    let server = create_server(FakeCatalog::with_items(playlists()), None);

    let response = server
        .delete("/api/v1/playlists/cache?mood=happy&language=Japan")
        .await;

    response.assert_status_ok();
    let cleared: InvalidateCacheResponse = decode(&response);
    assert_eq!(cleared.scope, InvalidationScope::Key);
}

#[tokio::test]
async fn test_select_playlists_search_failure_returns_default() {
    let server = create_server(FakeCatalog::failing(), None);

    let response = server
        .post("/api/v1/playlists")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({ "mood": "angry", "language": "Mandarin" })))
        .await;

    response.assert_status_ok();
    let selected: SelectPlaylistsResponse = decode(&response);
    assert!(selected.is_default);
    assert_eq!(selected.playlists.len(), 1);
    assert_eq!(selected.playlists[0].name, "Default Chill Playlist");
}

#[tokio::test]
async fn test_recommend_from_image() {
    let catalog = FakeCatalog::with_items(playlists());
    let server = create_server(catalog.clone(), Some(happy_face()));

    let response = server
        .post("/api/v1/recommend")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({
            "image_base64": BASE64.encode(PNG_HEADER),
            "language": "Japan"
        })))
        .await;

    response.assert_status_ok();
    let rec: RecommendResponse = decode(&response);
    assert_eq!(rec.recommendation.mood, Emotion::Happy);
    assert_eq!(rec.recommendation.source, MoodSource::Classifier);
    assert!(!rec.recommendation.is_default);
    assert!(rec.messages.is_empty());
    assert_eq!(catalog.last_query().as_deref(), Some("pop j-pop"));
}

#[tokio::test]
async fn test_recommend_classifier_failure_is_not_an_error() {
    let server = create_server(FakeCatalog::with_items(playlists()), None);

    let response = server
        .post("/api/v1/recommend")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({
            "image_base64": BASE64.encode(PNG_HEADER)
        })))
        .await;

    response.assert_status_ok();
    let rec: RecommendResponse = decode(&response);
    assert_eq!(rec.recommendation.mood, Emotion::Neutral);
    assert_eq!(rec.recommendation.confidence, 0.0);
    assert_eq!(rec.recommendation.source, MoodSource::Fallback);
    assert_eq!(rec.messages.len(), 1);
}

#[tokio::test]
async fn test_recommend_manual_mood_wins() {
    let catalog = FakeCatalog::with_items(playlists());
    let server = create_server(catalog.clone(), Some(happy_face()));

    let response = server
        .post("/api/v1/recommend")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({
            "image_base64": BASE64.encode(PNG_HEADER),
            "manual_mood": "disgust",
            "language": "Indonesia"
        })))
        .await;

    response.assert_status_ok();
    let rec: RecommendResponse = decode(&response);
    assert_eq!(rec.recommendation.mood, Emotion::Disgust);
    assert_eq!(rec.recommendation.source, MoodSource::Manual);
    assert_eq!(catalog.last_query().as_deref(), Some("metal indonesia"));
}

#[tokio::test]
async fn test_recommend_requires_input() {
    let server = create_server(FakeCatalog::with_items(playlists()), None);

    let response = server
        .post("/api/v1/recommend")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&HashMap::<String, String>::new()))
        .await;

    response.assert_status_not_ok();
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_recommend_rejects_unsupported_image() {
    let server = create_server(FakeCatalog::with_items(playlists()), Some(happy_face()));

    let response = server
        .post("/api/v1/recommend")
        .content_type("application/msgpack")
        .bytes(msgpack_bytes(&serde_json::json!({
            "image_base64": BASE64.encode(b"GIF89a\x01\x00\x01\x00")
        })))
        .await;

    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn test_invalid_content_type() {
    let server = create_server(FakeCatalog::with_items(playlists()), None);

    let response = server
        .post("/api/v1/playlists")
        .content_type("text/plain")
        .bytes(Bytes::from_static(b"mood=happy"))
        .await;

    response.assert_status_not_ok();
}
