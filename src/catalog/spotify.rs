//! Spotify Web API search client.
//!
//! Authenticates with the OAuth 2.0 client-credentials grant and searches
//! public playlists.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{CatalogError, CatalogItem, CatalogSearch, SearchRequest};
use crate::config::CatalogConfig;

/// Tokens are refreshed this long before Spotify says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN >= self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    playlists: Option<PlaylistPage>,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    /// Spotify returns `null` entries for removed playlists
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SpotifyPlaylist {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

/// Spotify catalog client
pub struct SpotifyClient {
    client: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
    accounts_url: String,
    api_url: String,
    retry_delay: Duration,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl SpotifyClient {
    /// Create a client from configuration.
    ///
    /// Missing credentials are not an error here; searches report
    /// [`CatalogError::NotConfigured`] instead.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .user_agent(concat!("moodify/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        Ok(Self {
            client,
            client_id: config.client_id.clone().filter(|s| !s.is_empty()),
            client_secret: config.client_secret.clone().filter(|s| !s.is_empty()),
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    async fn access_token(&self) -> Result<String, CatalogError> {
        {
            let guard = self.token.read().await;
            if let Some(ref cached) = *guard {
                if !cached.is_expired() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<String, CatalogError> {
        let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) else {
            return Err(CatalogError::NotConfigured);
        };

        let credentials = BASE64.encode(format!("{id}:{secret}"));
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Authorization", format!("Basic {credentials}"))
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::AuthFailed(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!(expires_in = token.expires_in, "Obtained catalog access token");

        let mut guard = self.token.write().await;
        *guard = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(token.access_token)
    }

    async fn search_once(&self, request: &SearchRequest) -> Result<Vec<CatalogItem>, CatalogError> {
        let token = self.access_token().await?;
        let limit = request.limit.to_string();
        let offset = request.offset.to_string();

        let response = self
            .client
            .get(format!("{}/v1/search", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("q", request.query.as_str()),
                ("type", request.item_type.as_str()),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.token.write().await.take();
                return Err(CatalogError::TokenExpired);
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(CatalogError::RateLimited),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(CatalogError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
            _ => {}
        }

        let body: serde_json::Value = response.json().await?;
        parse_search_response(body)
    }
}

#[async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<CatalogItem>, CatalogError> {
        if !self.is_configured() {
            return Err(CatalogError::NotConfigured);
        }

        (|| async { self.search_once(request).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(self.retry_delay)
                    .with_max_times(1)
                    .with_jitter(),
            )
            .when(|e: &CatalogError| e.should_retry())
            .notify(|err: &CatalogError, dur: Duration| {
                warn!(
                    error = %err,
                    "Catalog search failed, retrying after {:.2}s",
                    dur.as_secs_f64()
                );
            })
            .await
    }
}

/// Decode a `/v1/search` body into catalog items, tolerating malformed entries
fn parse_search_response(body: serde_json::Value) -> Result<Vec<CatalogItem>, CatalogError> {
    let response: SearchResponse =
        serde_json::from_value(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let items = response
        .playlists
        .map(|page| page.items)
        .unwrap_or_default()
        .into_iter()
        .map(|value| match serde_json::from_value::<SpotifyPlaylist>(value) {
            Ok(playlist) => CatalogItem {
                name: playlist.name,
                external_url: playlist.external_urls.and_then(|urls| urls.spotify),
            },
            Err(_) => CatalogItem::default(),
        })
        .collect();

    Ok(items)
}
