use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables.
///
/// All settings can be configured via environment variables with the `MOODIFY_` prefix.
/// For example: `MOODIFY_SERVER__PORT=8501`, `MOODIFY_CATALOG__CLIENT_ID=...`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Music catalog (Spotify) configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Emotion classifier service configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Playlist selection configuration
    #[serde(default)]
    pub playlist: PlaylistConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// OAuth client ID
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Accounts service base URL (token endpoint)
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,

    /// Web API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,

    /// Delay before the single retry of a failed search
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            accounts_url: default_accounts_url(),
            api_url: default_api_url(),
            timeout_secs: default_catalog_timeout(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl CatalogConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.as_deref().is_some_and(|s| !s.is_empty())
            && self.client_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

fn default_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_catalog_timeout() -> u64 {
    10
}

fn default_retry_delay() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the DeepFace-compatible service
    #[serde(default = "default_classifier_url")]
    pub url: String,

    /// Enable image classification (manual moods still work when disabled)
    #[serde(default = "default_classifier_enabled")]
    pub enabled: bool,

    /// Request timeout in seconds; analysis can take a while on CPU
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: default_classifier_url(),
            enabled: default_classifier_enabled(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

fn default_classifier_url() -> String {
    "http://localhost:5005".to_string()
}

fn default_classifier_enabled() -> bool {
    true
}

fn default_classifier_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistConfig {
    /// Maximum number of (mood, language) lookups kept in the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Number of playlists requested per search
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Upper bound (inclusive) of the random search offset
    #[serde(default = "default_max_offset")]
    pub max_offset: u32,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            result_limit: default_result_limit(),
            max_offset: default_max_offset(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    100
}

fn default_result_limit() -> u32 {
    5
}

fn default_max_offset() -> u32 {
    200
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body in bytes (image uploads)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl ServerConfig {
    /// Returns the socket address for binding the server
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables should be prefixed with `MOODIFY_` and use
    /// double underscores for nested values:
    /// - `MOODIFY_CATALOG__CLIENT_ID` -> catalog.client_id
    /// - `MOODIFY_CLASSIFIER__URL` -> classifier.url
    /// - `MOODIFY_PLAYLIST__CACHE_CAPACITY` -> playlist.cache_capacity
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MOODIFY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
