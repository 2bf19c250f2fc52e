//! Watchlist controller: keeps the tag list in step with the backend

use crate::api::WhisperApi;
use crate::error::ClientError;
use crate::view::{ViewBindings, render_tags};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Trim and upper-case raw input; `None` when nothing is left
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

/// Drives the stock input, the add button and the tag list
#[derive(Clone)]
pub struct WatchlistController {
    api: Arc<dyn WhisperApi>,
    view: ViewBindings,
}

impl WatchlistController {
    pub fn new(api: Arc<dyn WhisperApi>, view: ViewBindings) -> Self {
        Self { api, view }
    }

    /// Replace the tag list with the backend's watchlist
    ///
    /// On failure the previous tags stay on screen.
    pub async fn fetch_stocks(&self) {
        match self.api.list_stocks().await {
            Ok(stocks) => {
                debug!(count = stocks.len(), "watchlist fetched");
                self.view.stock_list.show_tags(&render_tags(&stocks));
            }
            Err(err) => error!(error = %err, "failed to fetch watchlist"),
        }
    }

    /// Add whatever is in the stock input
    pub async fn add_stock(&self) {
        let raw = self.view.stock_input.value();
        let Some(symbol) = normalize_symbol(&raw) else {
            debug!("empty symbol, nothing to add");
            return;
        };

        match self.api.add_stock(&symbol).await {
            Ok(()) => {
                info!(%symbol, "added to watchlist");
                self.view.stock_input.set_value("");
                self.fetch_stocks().await;
            }
            Err(ClientError::Rejected { status, detail }) => {
                warn!(%symbol, status, %detail, "backend rejected symbol");
                self.view.alerts.alert(&detail);
            }
            Err(err) => error!(%symbol, error = %err, "failed to add symbol"),
        }
    }

    /// Remove `symbol`, then refresh the list whatever the outcome
    pub async fn remove_stock(&self, symbol: &str) {
        match self.api.remove_stock(symbol).await {
            Ok(()) => info!(symbol, "removed from watchlist"),
            Err(err) => warn!(symbol, error = %err, "remove request failed"),
        }
        self.fetch_stocks().await;
    }
}

impl std::fmt::Debug for WatchlistController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistController").finish_non_exhaustive()
    }
}
