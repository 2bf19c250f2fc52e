//! reqwest implementation of the backend contract

use super::WhisperApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{AddStockRequest, AnalysisTask, ErrorDetail, Stock, TaskStatus};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// HTTP client for the watchlist backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a backend client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
        })
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint; each segment is percent-encoded on its own
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::ConfigError(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl WhisperApi for HttpBackend {
    async fn list_stocks(&self) -> Result<Vec<Stock>> {
        let url = self.endpoint(&["stocks"])?;
        debug!(%url, "GET watchlist");

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn add_stock(&self, symbol: &str) -> Result<()> {
        let url = self.endpoint(&["stocks"])?;
        debug!(%url, symbol, "POST watchlist entry");

        let response = self
            .client
            .post(url)
            .json(&AddStockRequest { symbol })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = serde_json::from_slice::<ErrorDetail>(&body)
            .map(|err| err.detail)
            .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));

        Err(ClientError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    async fn remove_stock(&self, symbol: &str) -> Result<()> {
        let url = self.endpoint(&["stocks", symbol])?;
        debug!(%url, "DELETE watchlist entry");

        let response = self.client.delete(url).send().await?;
        debug!(status = %response.status(), symbol, "delete answered");
        Ok(())
    }

    async fn start_analysis(&self) -> Result<AnalysisTask> {
        let url = self.endpoint(&["analyze", "start"])?;
        debug!(%url, "POST analysis start");

        let response = self.client.post(url).send().await?;
        Self::decode(response).await
    }

    async fn analysis_status(&self, task_id: &str) -> Result<TaskStatus> {
        let url = self.endpoint(&["analyze", "status", task_id])?;
        debug!(%url, "GET analysis status");

        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}
