use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend, including the /api prefix
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of movies requested per fetch
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Path of the JSON file holding the liked-movies set
    #[serde(default = "default_liked_movies_path")]
    pub liked_movies_path: String,

    /// Delay before the like-triggered personalized refresh fires, in milliseconds
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,

    /// Interval between backend health probes, in seconds
    #[serde(default = "default_health_poll_secs")]
    pub health_poll_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_page_limit() -> u32 {
    24
}

fn default_liked_movies_path() -> String {
    "likedMovies.json".to_string()
}

fn default_refresh_delay_ms() -> u64 {
    100
}

fn default_health_poll_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_limit: default_page_limit(),
            liked_movies_path: default_liked_movies_path(),
            refresh_delay_ms: default_refresh_delay_ms(),
            health_poll_secs: default_health_poll_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn refresh_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.health_poll_secs)
    }
}
