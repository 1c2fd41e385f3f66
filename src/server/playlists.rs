//! Playlist API route handlers.

use axum::extract::{Query, State};
use tracing::info;

use crate::playlist::{CacheStats, Language, ALL_LANGUAGES};
use crate::recommend::Notice;
use crate::types::{
    InvalidateCacheParams, InvalidateCacheResponse, InvalidationScope, ListLanguagesResponse,
    SelectPlaylistsRequest, SelectPlaylistsResponse,
};

use super::extractors::MsgPackBody;
use super::routes::MsgPack;
use super::AppState;

/// GET /api/v1/languages
pub async fn list_languages(State(_state): State<AppState>) -> MsgPack<ListLanguagesResponse> {
    MsgPack(ListLanguagesResponse {
        languages: ALL_LANGUAGES.to_vec(),
        default: Language::default(),
    })
}

/// POST /api/v1/playlists
///
/// Select playlists for a mood. Always succeeds; falls back to the default
/// playlist when the catalog has nothing usable.
pub async fn select_playlists(
    State(state): State<AppState>,
    MsgPackBody(req): MsgPackBody<SelectPlaylistsRequest>,
) -> MsgPack<SelectPlaylistsResponse> {
    let language = Language::parse_lenient(req.language.as_deref().unwrap_or_default());
    let selection = state.selector().select(&req.mood, language).await;

    MsgPack(SelectPlaylistsResponse {
        playlists: selection.entries(),
        is_default: selection.is_fallback(),
        notice: selection.fallback_reason().map(Notice::from),
        mood: req.mood,
        language,
    })
}

/// GET /api/v1/playlists/cache
pub async fn cache_stats(State(state): State<AppState>) -> MsgPack<CacheStats> {
    MsgPack(state.selector().cache_stats())
}

/// DELETE /api/v1/playlists/cache?mood=..&language=..
///
/// Without both parameters the whole cache is cleared ("get different
/// playlists").
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Query(params): Query<InvalidateCacheParams>,
) -> MsgPack<InvalidateCacheResponse> {
    let language = params.language.as_deref().map(Language::parse_lenient);
    let selector = state.selector();

    selector.invalidate(params.mood.as_deref(), language);

    let scope = match (&params.mood, language) {
        (Some(_), Some(_)) => InvalidationScope::Key,
        _ => InvalidationScope::All,
    };
    info!(?scope, mood = ?params.mood, "Playlist cache invalidated");

    MsgPack(InvalidateCacheResponse {
        scope,
        stats: selector.cache_stats(),
    })
}
