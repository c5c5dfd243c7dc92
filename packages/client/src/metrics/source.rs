//! Where metrics snapshots come from.

use std::time::Duration;

use async_trait::async_trait;

use cdc_feed_shared::metrics::MetricsSnapshot;

use crate::error::{ClientError, MetricsError};

/// A pull source of metrics snapshots
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the current snapshot
    async fn fetch(&self) -> Result<MetricsSnapshot, MetricsError>;
}

/// Metrics source backed by `GET` on the backend's metrics document
#[derive(Debug, Clone)]
pub struct HttpMetricsSource {
    client: reqwest::Client,
    url: String,
}

impl HttpMetricsSource {
    /// Create a source for `url` with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn fetch(&self) -> Result<MetricsSnapshot, MetricsError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetricsError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
