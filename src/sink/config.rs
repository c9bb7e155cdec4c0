// Sink configuration

use tracing::warn;

/// HTTP sink configuration
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Base URL objects are written under
    pub base_url: String,
    /// Bearer token for authentication
    pub token: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for HttpSinkConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            request_timeout_secs: 30,
        }
    }
}

impl HttpSinkConfig {
    /// Load from environment variables, `None` when no URL is configured
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("DBT_LOG_SINK_URL").ok()?;
        let mut config = HttpSinkConfig {
            base_url,
            token: std::env::var("DBT_LOG_SINK_TOKEN").ok(),
            ..Default::default()
        };

        if let Ok(v) = std::env::var("DBT_LOG_SINK_TIMEOUT_SECS") {
            match v.parse() {
                Ok(secs) => config.request_timeout_secs = secs,
                Err(_) => warn!(value = %v, "Invalid DBT_LOG_SINK_TIMEOUT_SECS, using default"),
            }
        }

        Some(config)
    }

    /// Object URL for a log path
    pub fn object_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
