//! Backend API used by the controllers
//!
//! [`WhisperApi`] is the seam between the UI controllers and the HTTP
//! contract; [`HttpBackend`] is the reqwest implementation.

pub mod http;

use crate::error::Result;
use crate::models::{AnalysisTask, Stock, TaskStatus};
use async_trait::async_trait;

pub use http::HttpBackend;

/// Operations the watchlist backend exposes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WhisperApi: Send + Sync {
    /// `GET /stocks`
    async fn list_stocks(&self) -> Result<Vec<Stock>>;

    /// `POST /stocks`
    ///
    /// A non-2xx answer surfaces as [`ClientError::Rejected`](crate::ClientError::Rejected).
    async fn add_stock(&self, symbol: &str) -> Result<()>;

    /// `DELETE /stocks/{symbol}`
    ///
    /// The response status is ignored; only transport failures are errors.
    async fn remove_stock(&self, symbol: &str) -> Result<()>;

    /// `POST /analyze/start`
    async fn start_analysis(&self) -> Result<AnalysisTask>;

    /// `GET /analyze/status/{task_id}`
    async fn analysis_status(&self, task_id: &str) -> Result<TaskStatus>;
}
