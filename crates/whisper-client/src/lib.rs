//! Market Whisperer client
//!
//! Keeps a stock watchlist in sync with the Market Whisperer backend and runs
//! its market analysis:
//!
//! - Watchlist management (list, add, remove symbols) over the REST API
//! - Starting an analysis job and polling it until it settles
//! - Rendering the resulting whispers as cards, or a placeholder when the
//!   market is silent
//!
//! # Architecture
//!
//! The backend sits behind the [`WhisperApi`] trait ([`HttpBackend`] in
//! production, a mock in tests). Two controllers drive the page:
//! - [`WatchlistController`]: the stock input, add button and tag list
//! - [`AnalysisController`]: the listen button and the results region
//!
//! Neither touches a concrete UI. They write to a [`ViewBindings`] supplied by
//! the host, and the host feeds raw events to [`App::dispatch`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use whisper_client::{App, ClientConfig, HttpBackend, MarkupView};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let api = Arc::new(HttpBackend::new(&config)?);
//!     let view = MarkupView::new()?;
//!
//!     let app = App::new(api, view.bindings(), &config);
//!     app.init().await;
//!     println!("{}", view.document()?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod models;
pub mod poller;
pub mod view;

pub use api::{HttpBackend, WhisperApi};
pub use config::ClientConfig;
pub use controller::{AnalysisController, App, Phase, WatchlistController, normalize_symbol};
pub use error::{ClientError, Result};
pub use events::{Action, ElementId, EventTable, Key, UiEvent};
pub use models::{AnalysisTask, Stock, TaskState, TaskStatus, Whisper};
pub use view::{MarkupView, Results, ViewBindings};
