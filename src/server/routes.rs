//! HTTP route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::types::{
    CatalogInfo, ClassifierInfo, ConfigResponse, HealthResponse, HealthStatus, PlaylistInfo,
    ServerInfo,
};

use super::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `MessagePack` response wrapper
pub struct MsgPack<T>(pub T);

impl<T: serde::Serialize> IntoResponse for MsgPack<T> {
    fn into_response(self) -> Response {
        match rmp_serde::to_vec_named(&self.0) {
            Ok(bytes) => (
                StatusCode::OK,
                [("content-type", "application/msgpack")],
                bytes,
            )
                .into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize response: {e}"),
            )
                .into_response(),
        }
    }
}

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> MsgPack<HealthResponse> {
    let catalog_configured = state.config.catalog.is_configured();

    // Without catalog credentials every lookup ends in the default playlist
    let status = if catalog_configured {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    MsgPack(HealthResponse {
        status,
        version: VERSION.to_string(),
        classifier_enabled: state.config.classifier.enabled,
        catalog_configured,
        uptime_secs: state.uptime_seconds(),
    })
}

/// Configuration endpoint
///
/// GET /api/v1/config
pub async fn config(State(state): State<AppState>) -> MsgPack<ConfigResponse> {
    let config = &state.config;

    MsgPack(ConfigResponse {
        server: ServerInfo {
            host: config.server.host.clone(),
            port: config.server.port,
        },
        catalog: CatalogInfo {
            api_url: config.catalog.api_url.clone(),
            configured: config.catalog.is_configured(),
            timeout_secs: config.catalog.timeout_secs,
        },
        classifier: ClassifierInfo {
            url: config.classifier.url.clone(),
            enabled: config.classifier.enabled,
        },
        playlist: PlaylistInfo {
            cache_capacity: config.playlist.cache_capacity,
            result_limit: config.playlist.result_limit,
            max_offset: config.playlist.max_offset,
        },
    })
}
