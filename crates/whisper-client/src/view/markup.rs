//! HTML rendering of the page regions
//!
//! Templates are registered under `.html` names so minijinja escapes every
//! interpolated value. Symbols and whisper fields coming from the backend are
//! always inserted as text.

use super::render::{Results, SILENT_MESSAGE, Tag, WhisperCard};
use super::{Alerts, LISTEN_LABEL, ResultsPanel, TagList, TextInput, Trigger, ViewBindings};
use crate::error::Result;
use minijinja::{Environment, context};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

const TAGS_TEMPLATE: &str = r#"{% for tag in tags %}
<div class="tag">
    {{ tag.symbol }}
    <span class="remove" data-symbol="{{ tag.symbol }}">&times;</span>
</div>
{% endfor %}"#;

const CARDS_TEMPLATE: &str = r#"{% for card in cards %}
<div class="whisper-card" style="animation-delay: {{ card.delay }}">
    <div class="card-header">
        <span class="stock-symbol">{{ card.symbol }}</span>
        <span class="severity-badge {{ card.severity_class }}">{{ card.kind }}</span>
    </div>
    <p class="message">{{ card.message }}</p>
    <p class="reasoning"><strong>Analysis:</strong> {{ card.reasoning }}</p>
    <span class="action-badge {{ card.action_class }}">{{ card.action }}</span>
</div>
{% endfor %}"#;

const MESSAGE_TEMPLATE: &str = r#"{% if tone == "silent" -%}
<p style="text-align:center; color:var(--text-secondary); grid-column: 1/-1;">{{ message }}</p>
{%- else -%}
<p style="text-align:center; color:var(--danger-color)">{{ message }}</p>
{%- endif %}"#;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Market Whisperer</title></head>
<body>
<input id="stockInput" type="text" value="{{ input }}">
<button id="addBtn"{% if not add_enabled %} disabled{% endif %}>{{ add_label }}</button>
<div id="stockList">{{ stock_list | safe }}</div>
<button id="listenBtn"{% if not listen_enabled %} disabled{% endif %}>{{ listen_label }}</button>
<section id="resultsSection">{{ results | safe }}</section>
</body>
</html>
"#;

#[derive(Serialize)]
struct TagContext<'a> {
    symbol: &'a str,
}

#[derive(Serialize)]
struct CardContext<'a> {
    symbol: &'a str,
    kind: &'a str,
    severity_class: &'a str,
    message: &'a str,
    reasoning: &'a str,
    action: &'a str,
    action_class: &'a str,
    delay: String,
}

impl<'a> From<&'a WhisperCard> for CardContext<'a> {
    fn from(card: &'a WhisperCard) -> Self {
        Self {
            symbol: &card.symbol,
            kind: &card.kind,
            severity_class: &card.severity_class,
            message: &card.message,
            reasoning: &card.reasoning,
            action: &card.action,
            action_class: &card.action_class,
            delay: format!("{:.1}s", card.animation_delay.as_secs_f64()),
        }
    }
}

/// Renders tags and results to escaped HTML fragments
#[derive(Debug)]
pub struct MarkupRenderer {
    env: Environment<'static>,
}

impl MarkupRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("tags.html", TAGS_TEMPLATE)?;
        env.add_template("cards.html", CARDS_TEMPLATE)?;
        env.add_template("message.html", MESSAGE_TEMPLATE)?;
        env.add_template("page.html", PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Content of the `stockList` region
    pub fn tags(&self, tags: &[Tag]) -> Result<String> {
        let tags: Vec<TagContext<'_>> = tags
            .iter()
            .map(|tag| TagContext {
                symbol: &tag.symbol,
            })
            .collect();
        let html = self
            .env
            .get_template("tags.html")?
            .render(context! { tags })?;
        Ok(html)
    }

    /// Content of the `resultsSection` region
    pub fn results(&self, results: &Results) -> Result<String> {
        let html = match results {
            Results::Cleared => String::new(),
            Results::Silent => self.message("silent", SILENT_MESSAGE)?,
            Results::Error(message) => self.message("error", message)?,
            Results::Cards(cards) => {
                let cards: Vec<CardContext<'_>> = cards.iter().map(CardContext::from).collect();
                self.env
                    .get_template("cards.html")?
                    .render(context! { cards })?
            }
        };
        Ok(html)
    }

    fn message(&self, tone: &str, message: &str) -> Result<String> {
        let html = self
            .env
            .get_template("message.html")?
            .render(context! { tone, message })?;
        Ok(html)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Text field state
#[derive(Debug, Default)]
pub struct MarkupInput {
    value: Mutex<String>,
}

impl TextInput for MarkupInput {
    fn value(&self) -> String {
        lock(&self.value).clone()
    }

    fn set_value(&self, value: &str) {
        *lock(&self.value) = value.to_string();
    }
}

/// Button state
#[derive(Debug)]
pub struct MarkupButton {
    state: Mutex<(String, bool)>,
}

impl MarkupButton {
    pub fn new(label: &str) -> Self {
        Self {
            state: Mutex::new((label.to_string(), true)),
        }
    }

    pub fn label(&self) -> String {
        lock(&self.state).0.clone()
    }

    pub fn enabled(&self) -> bool {
        lock(&self.state).1
    }
}

impl Trigger for MarkupButton {
    fn set_label(&self, label: &str) {
        lock(&self.state).0 = label.to_string();
    }

    fn set_enabled(&self, enabled: bool) {
        lock(&self.state).1 = enabled;
    }
}

/// A region whose content is an HTML fragment
#[derive(Debug)]
pub struct MarkupRegion {
    renderer: Arc<MarkupRenderer>,
    html: Mutex<String>,
}

impl MarkupRegion {
    fn new(renderer: Arc<MarkupRenderer>) -> Self {
        Self {
            renderer,
            html: Mutex::new(String::new()),
        }
    }

    pub fn inner_html(&self) -> String {
        lock(&self.html).clone()
    }

    fn replace(&self, rendered: Result<String>) {
        match rendered {
            Ok(html) => *lock(&self.html) = html,
            Err(err) => error!(error = %err, "failed to render region"),
        }
    }
}

impl TagList for MarkupRegion {
    fn show_tags(&self, tags: &[Tag]) {
        self.replace(self.renderer.tags(tags));
    }
}

impl ResultsPanel for MarkupRegion {
    fn show(&self, results: &Results) {
        self.replace(self.renderer.results(results));
    }
}

/// Alerts are logged and kept for the host to display
#[derive(Debug, Default)]
pub struct MarkupAlerts {
    messages: Mutex<Vec<String>>,
}

impl MarkupAlerts {
    /// Pending alerts, oldest first; the queue is emptied
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.messages))
    }
}

impl Alerts for MarkupAlerts {
    fn alert(&self, message: &str) {
        info!(%message, "alert");
        lock(&self.messages).push(message.to_string());
    }
}

/// A whole page kept as HTML
#[derive(Debug)]
pub struct MarkupView {
    renderer: Arc<MarkupRenderer>,
    pub stock_input: Arc<MarkupInput>,
    pub add_button: Arc<MarkupButton>,
    pub stock_list: Arc<MarkupRegion>,
    pub listen_button: Arc<MarkupButton>,
    pub results_section: Arc<MarkupRegion>,
    pub alerts: Arc<MarkupAlerts>,
}

impl MarkupView {
    pub fn new() -> Result<Self> {
        let renderer = Arc::new(MarkupRenderer::new()?);
        Ok(Self {
            stock_input: Arc::default(),
            add_button: Arc::new(MarkupButton::new("Add")),
            stock_list: Arc::new(MarkupRegion::new(Arc::clone(&renderer))),
            listen_button: Arc::new(MarkupButton::new(LISTEN_LABEL)),
            results_section: Arc::new(MarkupRegion::new(Arc::clone(&renderer))),
            alerts: Arc::default(),
            renderer,
        })
    }

    pub fn bindings(&self) -> ViewBindings {
        ViewBindings {
            stock_input: self.stock_input.clone(),
            add_button: self.add_button.clone(),
            stock_list: self.stock_list.clone(),
            listen_button: self.listen_button.clone(),
            results_section: self.results_section.clone(),
            alerts: self.alerts.clone(),
        }
    }

    /// Snapshot of the full page
    pub fn document(&self) -> Result<String> {
        let html = self.renderer.env.get_template("page.html")?.render(context! {
            input => self.stock_input.value(),
            add_label => self.add_button.label(),
            add_enabled => self.add_button.enabled(),
            stock_list => self.stock_list.inner_html(),
            listen_label => self.listen_button.label(),
            listen_enabled => self.listen_button.enabled(),
            results => self.results_section.inner_html(),
        })?;
        Ok(html)
    }
}
