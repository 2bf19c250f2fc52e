//! Host-side view bindings
//!
//! The controllers never touch a concrete UI. A host hands them a
//! [`ViewBindings`] holding one typed handle per page element:
//!
//! | Element          | Handle              |
//! |------------------|---------------------|
//! | `stockInput`     | [`TextInput`]       |
//! | `addBtn`         | [`Trigger`]         |
//! | `stockList`      | [`TagList`]         |
//! | `listenBtn`      | [`Trigger`]         |
//! | `resultsSection` | [`ResultsPanel`]    |
//!
//! plus an [`Alerts`] sink for blocking notices. Everything rendered into the
//! two regions is structured data ([`Tag`], [`Results`]); hosts bind the
//! strings as text, never as markup.

pub mod markup;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use markup::{MarkupRenderer, MarkupView};
pub use render::{Results, Tag, WhisperCard, render_tags, render_whispers};

/// Label of the listen trigger while idle
pub const LISTEN_LABEL: &str = "LISTEN TO THE MARKET";

/// Label while the analysis job is being started
pub const LISTENING_LABEL: &str = "LISTENING...";

/// Label while the analysis job is being polled
pub const ANALYZING_LABEL: &str = "ANALYZING...";

/// A single-line text field
pub trait TextInput: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
}

/// A clickable control with a label
pub trait Trigger: Send + Sync {
    fn set_label(&self, label: &str);
    fn set_enabled(&self, enabled: bool);
}

/// The region listing watchlist tags
pub trait TagList: Send + Sync {
    /// Replace every displayed tag
    fn show_tags(&self, tags: &[Tag]);
}

/// The region showing analysis output
pub trait ResultsPanel: Send + Sync {
    /// Replace the region's content
    fn show(&self, results: &Results);
}

/// Blocking user notices
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

/// Typed handles to the page elements the controllers drive
#[derive(Clone)]
pub struct ViewBindings {
    pub stock_input: Arc<dyn TextInput>,
    pub add_button: Arc<dyn Trigger>,
    pub stock_list: Arc<dyn TagList>,
    pub listen_button: Arc<dyn Trigger>,
    pub results_section: Arc<dyn ResultsPanel>,
    pub alerts: Arc<dyn Alerts>,
}

impl std::fmt::Debug for ViewBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBindings").finish_non_exhaustive()
    }
}
