//! Page controllers and the [`App`] that routes host events to them

pub mod analysis;
pub mod watchlist;

pub use analysis::{AnalysisController, Phase};
pub use watchlist::{WatchlistController, normalize_symbol};

use crate::api::WhisperApi;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::events::{Action, ElementId, EventTable, UiEvent};
use crate::view::ViewBindings;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The whole client: both controllers plus the event wiring
#[derive(Debug)]
pub struct App {
    watchlist: WatchlistController,
    analysis: AnalysisController,
    events: EventTable,
}

impl App {
    pub fn new(api: Arc<dyn WhisperApi>, view: ViewBindings, config: &ClientConfig) -> Self {
        Self {
            watchlist: WatchlistController::new(Arc::clone(&api), view.clone()),
            analysis: AnalysisController::new(api, view, config.poll_interval),
            events: EventTable::standard(),
        }
    }

    /// Page-load work: render the current watchlist
    pub async fn init(&self) {
        info!("loading watchlist");
        self.watchlist.fetch_stocks().await;
    }

    /// Route a raw host event; `false` when nothing is bound to it
    pub async fn dispatch(&self, element: ElementId, event: UiEvent) -> bool {
        let Some(action) = self.events.resolve(element, &event).cloned() else {
            debug!(?element, ?event, "unbound event");
            return false;
        };

        if let Err(err) = self.perform(&action).await {
            warn!(?action, error = %err, "action ignored");
        }
        true
    }

    /// Run one controller operation
    pub async fn perform(&self, action: &Action) -> Result<()> {
        match action {
            Action::AddStock => self.watchlist.add_stock().await,
            Action::RemoveStock(symbol) => self.watchlist.remove_stock(symbol).await,
            Action::AnalyzeMarket => return self.analysis.analyze_market().await,
        }
        Ok(())
    }

    /// Cancel a running analysis; `false` when none was running
    pub async fn abort_analysis(&self) -> bool {
        self.analysis.abort().await
    }

    /// Wait for the current analysis (if any) to finish
    pub async fn wait_for_analysis(&self) {
        self.analysis.wait_idle().await;
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis.phase() != Phase::Idle
    }

    pub fn watchlist(&self) -> &WatchlistController {
        &self.watchlist
    }
}
