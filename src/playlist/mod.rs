//! Playlist selection for a mood and language preference.
//!
//! Builds a catalog query from the mood's genre keyword, serves repeated
//! lookups from a bounded LRU cache and degrades to a fixed default playlist
//! whenever the catalog has nothing usable.

mod cache;
pub mod query;

pub use cache::{CacheStats, PlaylistCache, PlaylistQueryKey};
pub use query::{build_query, genre_for, Language, ALL_LANGUAGES, DEFAULT_GENRE, MOOD_GENRES};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogItem, CatalogSearch, SearchRequest};
use crate::config::PlaylistConfig;

/// Name of the fallback playlist; callers match on it to detect the default
pub const DEFAULT_PLAYLIST_NAME: &str = "Default Chill Playlist";

/// Link of the fallback playlist
pub const DEFAULT_PLAYLIST_URL: &str = "https://open.spotify.com/playlist/37i9dQZF1DX4WYpdgoIcn6";

/// A playable playlist link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The fixed fallback entry
    pub fn default_entry() -> Self {
        Self::new(DEFAULT_PLAYLIST_NAME, DEFAULT_PLAYLIST_URL)
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_PLAYLIST_NAME
    }

    /// Convert a catalog hit, rejecting items without a name or a web link
    fn from_item(item: CatalogItem) -> Option<Self> {
        let name = item.name?.trim().to_string();
        let url = item.external_url?.trim().to_string();

        if name.is_empty() || !(url.starts_with("https://") || url.starts_with("http://")) {
            return None;
        }

        Some(Self { name, url })
    }
}

/// Why the selector fell back to the default playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The catalog call failed (network, auth, malformed response)
    SearchFailed,
    /// The catalog answered but no entry survived filtering
    EmptyResult,
}

/// Outcome of a playlist selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Real results, in catalog ranking order (never empty)
    Found(Vec<PlaylistEntry>),
    /// Nothing usable; stands for exactly the default entry
    Fallback(FallbackReason),
}

impl Selection {
    /// Entries to present; a fallback yields exactly the default entry
    pub fn entries(&self) -> Vec<PlaylistEntry> {
        match self {
            Selection::Found(entries) => entries.clone(),
            Selection::Fallback(_) => vec![PlaylistEntry::default_entry()],
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Selection::Found(_) => None,
            Selection::Fallback(reason) => Some(*reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Selection::Fallback(_))
    }
}

/// Selects playlists for moods, owning its own lookup cache
pub struct PlaylistSelector {
    catalog: Arc<dyn CatalogSearch>,
    cache: PlaylistCache,
    result_limit: u32,
    max_offset: u32,
}

impl PlaylistSelector {
    pub fn new(catalog: Arc<dyn CatalogSearch>, config: &PlaylistConfig) -> Self {
        Self {
            catalog,
            cache: PlaylistCache::new(config.cache_capacity),
            result_limit: config.result_limit,
            max_offset: config.max_offset,
        }
    }

    /// Select playlists for a mood label and language preference.
    ///
    /// Never fails: search errors and empty results come back as
    /// [`Selection::Fallback`]. Only real results are cached.
    pub async fn select(&self, mood: &str, language: Language) -> Selection {
        let key = PlaylistQueryKey::new(mood, language);
        if let Some(cached) = self.cache.get(&key) {
            debug!(mood, %language, "Playlist cache hit");
            return Selection::Found(cached.as_ref().clone());
        }

        let query = build_query(mood, language);
        let request = SearchRequest::playlists(query, self.result_limit, random_offset(self.max_offset));

        let items = match self.catalog.search(&request).await {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    mood,
                    %language,
                    query = %request.query,
                    error = %e,
                    "Playlist search failed, using default playlist"
                );
                return Selection::Fallback(FallbackReason::SearchFailed);
            }
        };

        let received = items.len();
        let entries: Vec<PlaylistEntry> = items
            .into_iter()
            .filter_map(PlaylistEntry::from_item)
            .collect();

        if entries.is_empty() {
            info!(
                mood,
                %language,
                query = %request.query,
                received,
                "No usable playlists found, using default playlist"
            );
            return Selection::Fallback(FallbackReason::EmptyResult);
        }

        info!(
            mood,
            %language,
            query = %request.query,
            offset = request.offset,
            count = entries.len(),
            dropped = received - entries.len(),
            "Selected playlists"
        );

        self.cache.put(key, entries.clone());
        Selection::Found(entries)
    }

    /// Drop cached lookups.
    ///
    /// With both mood and language only that key is dropped; otherwise the
    /// whole cache is cleared.
    pub fn invalidate(&self, mood: Option<&str>, language: Option<Language>) {
        match (mood, language) {
            (Some(mood), Some(language)) => {
                debug!(mood, %language, "Invalidating playlist cache entry");
                self.cache.invalidate(&PlaylistQueryKey::new(mood, language));
            }
            _ => {
                debug!("Clearing playlist cache");
                self.cache.invalidate_all();
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn random_offset(max_offset: u32) -> u32 {
    rand::rng().random_range(0..=max_offset)
}
