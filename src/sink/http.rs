// HTTP sink - whole-object PUT to remote storage

use super::{HttpSinkConfig, LogSink, Result, SinkError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Writes logs to a remote object store over HTTP
#[derive(Clone)]
pub struct HttpSink {
    config: HttpSinkConfig,
    client: Client,
}

impl HttpSink {
    /// Create a new HTTP sink
    pub fn new(config: HttpSinkConfig) -> Result<Self> {
        info!(
            base_url = %config.base_url,
            timeout_secs = config.request_timeout_secs,
            has_token = config.token.is_some(),
            "initializing http log sink"
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl LogSink for HttpSink {
    async fn put(&self, path: &str, content: &str, overwrite: bool) -> Result<()> {
        let url = self.config.object_url(path);

        let mut request = self
            .client
            .put(&url)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(content.to_string());

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        if !overwrite {
            request = request.header("If-None-Match", "*");
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(url = %url, bytes = content.len(), status = status.as_u16(), "log written over http");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_joins_cleanly() {
        let config = HttpSinkConfig {
            base_url: "https://storage.example.com/logs/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.object_url("/dbt_logs/run.log"),
            "https://storage.example.com/logs/dbt_logs/run.log"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let sink = HttpSink::new(HttpSinkConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let result = sink.put("run.log", "content", true).await;
        assert!(result.is_err(), "Write to closed port should fail");
    }
}
