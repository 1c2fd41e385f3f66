//! External music catalog search.
//!
//! The playlist selector only depends on the [`CatalogSearch`] trait; the
//! Spotify Web API client is the production implementation.

mod spotify;

pub use spotify::SpotifyClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for catalog operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog credentials not configured")]
    NotConfigured,

    #[error("Catalog authentication failed: {0}")]
    AuthFailed(String),

    #[error("Catalog access token expired")]
    TokenExpired,

    #[error("Catalog rate limit exceeded")]
    RateLimited,

    #[error("Catalog request failed: {0}")]
    Request(String),

    #[error("Catalog API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed catalog response: {0}")]
    Malformed(String),
}

impl CatalogError {
    /// Whether the failure is transient and worth one more attempt
    pub fn should_retry(&self) -> bool {
        match self {
            Self::RateLimited | Self::Request(_) | Self::TokenExpired => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Malformed(err.to_string())
        } else {
            CatalogError::Request(err.to_string())
        }
    }
}

/// Kind of catalog item to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Playlist,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Playlist => "playlist",
        }
    }
}

/// A single catalog search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub item_type: ItemType,
    pub limit: u32,
    pub offset: u32,
}

impl SearchRequest {
    pub fn playlists(query: impl Into<String>, limit: u32, offset: u32) -> Self {
        Self {
            query: query.into(),
            item_type: ItemType::Playlist,
            limit,
            offset,
        }
    }
}

/// A search hit as returned by the catalog.
///
/// Fields are optional because catalog responses are not trusted to be
/// well-formed; the selector drops incomplete items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, external_url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            external_url: Some(external_url.into()),
        }
    }
}

/// Ranked text search over an external catalog
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Run a search; items come back in the catalog's ranking order
    async fn search(&self, request: &SearchRequest) -> Result<Vec<CatalogItem>, CatalogError>;
}
