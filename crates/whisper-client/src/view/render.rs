//! Pure mappings from wire types to displayable items

use crate::events::Action;
use crate::models::{Stock, Whisper};
use std::time::Duration;

/// Shown when an analysis finds nothing
pub const SILENT_MESSAGE: &str = "The market is silent... for now.";

/// Shown when the analysis job could not be started
pub const START_FAILED_MESSAGE: &str = "Failed to start analysis.";

/// Shown when polling the job fails at the transport level
pub const POLL_FAILED_MESSAGE: &str = "Lost contact with the analysis. Please try again.";

/// Stagger between consecutive card animations
pub const CARD_STAGGER: Duration = Duration::from_millis(100);

/// One removable watchlist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub symbol: String,
    /// What the tag's remove control triggers
    pub on_remove: Action,
}

/// One rendered whisper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhisperCard {
    pub symbol: String,
    pub kind: String,
    pub severity: String,
    pub severity_class: String,
    pub message: String,
    pub reasoning: String,
    pub action: String,
    pub action_class: String,
    pub animation_delay: Duration,
}

impl WhisperCard {
    /// Every user-visible string on the card, in display order
    pub fn texts(&self) -> [&str; 6] {
        [
            self.symbol.as_str(),
            self.kind.as_str(),
            self.severity.as_str(),
            self.message.as_str(),
            self.reasoning.as_str(),
            self.action.as_str(),
        ]
    }
}

/// Content of the results region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Results {
    /// Nothing shown
    Cleared,
    /// Analysis ran and produced no whispers
    Silent,
    /// One card per whisper
    Cards(Vec<WhisperCard>),
    /// Inline error message
    Error(String),
}

impl Results {
    /// Plain text of a message variant
    pub fn message(&self) -> Option<&str> {
        match self {
            Results::Silent => Some(SILENT_MESSAGE),
            Results::Error(message) => Some(message),
            Results::Cleared | Results::Cards(_) => None,
        }
    }
}

/// Map stocks to tags, in server order
pub fn render_tags(stocks: &[Stock]) -> Vec<Tag> {
    stocks
        .iter()
        .map(|stock| Tag {
            symbol: stock.symbol.clone(),
            on_remove: Action::RemoveStock(stock.symbol.clone()),
        })
        .collect()
}

/// Map whispers to cards, or the silent placeholder when there are none
pub fn render_whispers(whispers: &[Whisper]) -> Results {
    if whispers.is_empty() {
        return Results::Silent;
    }

    let cards = whispers
        .iter()
        .zip(0u32..)
        .map(|(whisper, index)| WhisperCard {
            symbol: whisper.symbol.clone(),
            kind: whisper.kind.clone(),
            severity: whisper.severity.clone(),
            severity_class: style_class("severity", &whisper.severity),
            message: whisper.message.clone(),
            reasoning: whisper.reasoning.clone(),
            action: whisper.action.clone(),
            action_class: style_class("action", &whisper.action),
            animation_delay: CARD_STAGGER * index,
        })
        .collect();

    Results::Cards(cards)
}

/// `prefix-value`, with anything but ASCII alphanumerics in `value` turned into `-`
fn style_class(prefix: &str, value: &str) -> String {
    let suffix: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{prefix}-{suffix}")
}
