//! HTTP server setup and routing.

mod extractors;
mod mood;
mod playlists;
mod recommend;
mod routes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::catalog::{CatalogSearch, SpotifyClient};
use crate::classifier::{DeepFaceClient, EmotionClassifier};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::playlist::PlaylistSelector;
use crate::recommend::Recommender;

pub use extractors::MsgPackBody;
pub use routes::MsgPack;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Pipeline; owns the playlist selector and its cache
    pub recommender: Arc<Recommender>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    /// Build state with the Spotify and DeepFace clients described by `config`
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let catalog = SpotifyClient::new(&config.catalog)
            .map_err(|e| AppError::Internal(format!("Failed to create catalog client: {e}")))?;
        let classifier = DeepFaceClient::new(&config.classifier)
            .map_err(|e| AppError::Internal(format!("Failed to create classifier client: {e}")))?;

        Ok(Self::with_services(config, Arc::new(classifier), Arc::new(catalog)))
    }

    /// Build state around caller-provided collaborators
    pub fn with_services(
        config: AppConfig,
        classifier: Arc<dyn EmotionClassifier>,
        catalog: Arc<dyn CatalogSearch>,
    ) -> Self {
        let selector = Arc::new(PlaylistSelector::new(catalog, &config.playlist));
        let recommender = Arc::new(Recommender::new(classifier, selector));

        Self {
            config: Arc::new(config),
            recommender,
            started_at: Instant::now(),
        }
    }

    pub fn selector(&self) -> &Arc<PlaylistSelector> {
        self.recommender.selector()
    }

    /// Seconds since the state was built
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Creates the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/config", get(routes::config))
        // Mood endpoints
        .route("/moods", get(mood::list_moods))
        .route("/mood/resolve", post(mood::resolve_mood))
        // Playlist endpoints
        .route("/languages", get(playlists::list_languages))
        .route("/playlists", post(playlists::select_playlists))
        .route(
            "/playlists/cache",
            get(playlists::cache_stats).delete(playlists::invalidate_cache),
        )
        // Full pipeline
        .route("/recommend", post(recommend::recommend));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
