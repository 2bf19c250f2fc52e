//! Terminal host: prints the page regions to stdout

use anyhow::{Context, bail};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use whisper_client::view::{
    Alerts, LISTEN_LABEL, Results, ResultsPanel, Tag, TagList, TextInput, Trigger, ViewBindings,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Watchlist as a one-column table
pub fn tags_table(tags: &[Tag]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Watchlist"]);

    for tag in tags {
        table.add_row(vec![Cell::new(&tag.symbol)]);
    }
    table
}

/// Text for the results region; `None` when it is cleared
pub fn results_text(results: &Results) -> Option<String> {
    match results {
        Results::Cleared => None,
        Results::Silent | Results::Error(_) => results.message().map(str::to_string),
        Results::Cards(cards) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "Symbol",
                    "Type",
                    "Severity",
                    "Message",
                    "Analysis",
                    "Action",
                ]);
            for card in cards {
                table.add_row(card.texts().map(Cell::new));
            }
            Some(table.to_string())
        }
    }
}

#[derive(Debug, Default)]
pub struct TerminalInput {
    value: Mutex<String>,
}

impl TextInput for TerminalInput {
    fn value(&self) -> String {
        lock(&self.value).clone()
    }

    fn set_value(&self, value: &str) {
        *lock(&self.value) = value.to_string();
    }
}

/// Prints the label whenever it changes
#[derive(Debug)]
pub struct TerminalButton {
    label: Mutex<String>,
    enabled: Mutex<bool>,
    quiet: bool,
}

impl TerminalButton {
    fn new(label: &str, quiet: bool) -> Self {
        Self {
            label: Mutex::new(label.to_string()),
            enabled: Mutex::new(true),
            quiet,
        }
    }

    pub fn enabled(&self) -> bool {
        *lock(&self.enabled)
    }
}

impl Trigger for TerminalButton {
    fn set_label(&self, label: &str) {
        let mut current = lock(&self.label);
        if *current != label {
            if !self.quiet && label != LISTEN_LABEL {
                println!("» {label}");
            }
            *current = label.to_string();
        }
    }

    fn set_enabled(&self, enabled: bool) {
        *lock(&self.enabled) = enabled;
    }
}

/// Prints the watchlist and remembers the symbols last shown
#[derive(Debug, Default)]
pub struct TerminalTags {
    shown: Mutex<Option<Vec<String>>>,
}

impl TerminalTags {
    /// `None` until the list has been rendered once
    pub fn symbols(&self) -> Option<Vec<String>> {
        lock(&self.shown).clone()
    }
}

impl TagList for TerminalTags {
    fn show_tags(&self, tags: &[Tag]) {
        if tags.is_empty() {
            println!("Watchlist is empty.");
        } else {
            println!("{}", tags_table(tags));
        }
        *lock(&self.shown) = Some(tags.iter().map(|tag| tag.symbol.clone()).collect());
    }
}

/// Prints results and remembers the last one shown
#[derive(Debug)]
pub struct TerminalResults {
    last: Mutex<Results>,
}

impl TerminalResults {
    pub fn last(&self) -> Results {
        lock(&self.last).clone()
    }
}

impl ResultsPanel for TerminalResults {
    fn show(&self, results: &Results) {
        if let Some(text) = results_text(results) {
            println!("{text}");
        }
        *lock(&self.last) = results.clone();
    }
}

/// Alerts go to stderr
#[derive(Debug, Default)]
pub struct TerminalAlerts;

impl Alerts for TerminalAlerts {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

/// All page elements, rendered to the terminal
#[derive(Debug)]
pub struct TerminalView {
    pub input: Arc<TerminalInput>,
    pub add_button: Arc<TerminalButton>,
    pub stock_list: Arc<TerminalTags>,
    pub listen_button: Arc<TerminalButton>,
    pub results: Arc<TerminalResults>,
    pub alerts: Arc<TerminalAlerts>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            input: Arc::default(),
            add_button: Arc::new(TerminalButton::new("Add", true)),
            stock_list: Arc::default(),
            listen_button: Arc::new(TerminalButton::new(LISTEN_LABEL, false)),
            results: Arc::new(TerminalResults {
                last: Mutex::new(Results::Cleared),
            }),
            alerts: Arc::default(),
        }
    }

    /// Fails unless the watchlist reached the screen
    pub fn ensure_listed(&self) -> anyhow::Result<Vec<String>> {
        self.stock_list
            .symbols()
            .context("could not load the watchlist from the backend")
    }

    /// Fails unless `symbol` was accepted; the input is cleared only on success
    pub fn ensure_added(&self, symbol: &str) -> anyhow::Result<()> {
        if !self.input.value().is_empty() {
            bail!("{symbol} was not added");
        }
        Ok(())
    }

    /// Fails unless a refreshed watchlist no longer holds `symbol`
    pub fn ensure_removed(&self, symbol: &str) -> anyhow::Result<()> {
        if self.ensure_listed()?.iter().any(|shown| shown == symbol) {
            bail!("{symbol} is still on the watchlist");
        }
        Ok(())
    }

    /// Fails when the run ended with an error in the results region
    pub fn ensure_analyzed(&self) -> anyhow::Result<()> {
        if let Results::Error(message) = self.results.last() {
            bail!("{message}");
        }
        Ok(())
    }

    pub fn bindings(&self) -> ViewBindings {
        ViewBindings {
            stock_input: self.input.clone(),
            add_button: self.add_button.clone(),
            stock_list: self.stock_list.clone(),
            listen_button: self.listen_button.clone(),
            results_section: self.results.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}
