use crate::config::ApiConfig;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Thin JSON-over-HTTP wrapper. One attempt per call: no retry.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// GET `url` and decode the body as JSON. Non-2xx statuses are errors.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url, timeout: Option<Duration>) -> Result<T> {
        debug!("GET {}", url);

        let mut request = self.inner.get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let resp = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Bad status from {}", url))?;

        resp.json::<T>()
            .await
            .with_context(|| format!("Failed to decode JSON from {}", url))
    }
}
