//! In-memory view used by controller tests

use super::{Alerts, Results, ResultsPanel, Tag, TagList, TextInput, Trigger, ViewBindings};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct RecordingInput {
    value: Mutex<String>,
}

impl RecordingInput {
    pub fn type_text(&self, text: &str) {
        *self.value.lock().unwrap() = text.to_string();
    }
}

impl TextInput for RecordingInput {
    fn value(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.lock().unwrap() = value.to_string();
    }
}

#[derive(Default)]
pub(crate) struct RecordingTrigger {
    label: Mutex<String>,
    enabled: Mutex<bool>,
    labels: Mutex<Vec<String>>,
}

impl RecordingTrigger {
    pub fn idle() -> Self {
        Self {
            label: Mutex::new(super::LISTEN_LABEL.to_string()),
            enabled: Mutex::new(true),
            labels: Mutex::new(Vec::new()),
        }
    }

    pub fn label(&self) -> String {
        self.label.lock().unwrap().clone()
    }

    pub fn enabled(&self) -> bool {
        *self.enabled.lock().unwrap()
    }

    /// Every label set so far, oldest first
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

impl Trigger for RecordingTrigger {
    fn set_label(&self, label: &str) {
        *self.label.lock().unwrap() = label.to_string();
        self.labels.lock().unwrap().push(label.to_string());
    }

    fn set_enabled(&self, enabled: bool) {
        *self.enabled.lock().unwrap() = enabled;
    }
}

#[derive(Default)]
pub(crate) struct RecordingTags {
    renders: Mutex<Vec<Vec<Tag>>>,
}

impl RecordingTags {
    pub fn render_count(&self) -> usize {
        self.renders.lock().unwrap().len()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.renders
            .lock()
            .unwrap()
            .last()
            .map(|tags| tags.iter().map(|t| t.symbol.clone()).collect())
            .unwrap_or_default()
    }
}

impl TagList for RecordingTags {
    fn show_tags(&self, tags: &[Tag]) {
        self.renders.lock().unwrap().push(tags.to_vec());
    }
}

#[derive(Default)]
pub(crate) struct RecordingResults {
    shown: Mutex<Vec<Results>>,
}

impl RecordingResults {
    pub fn last(&self) -> Option<Results> {
        self.shown.lock().unwrap().last().cloned()
    }

    pub fn history(&self) -> Vec<Results> {
        self.shown.lock().unwrap().clone()
    }
}

impl ResultsPanel for RecordingResults {
    fn show(&self, results: &Results) {
        self.shown.lock().unwrap().push(results.clone());
    }
}

#[derive(Default)]
pub(crate) struct RecordingAlerts {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Alerts for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// All five elements plus alerts, each kept for inspection
pub(crate) struct RecordingView {
    pub input: Arc<RecordingInput>,
    pub add_button: Arc<RecordingTrigger>,
    pub stock_list: Arc<RecordingTags>,
    pub listen_button: Arc<RecordingTrigger>,
    pub results: Arc<RecordingResults>,
    pub alerts: Arc<RecordingAlerts>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self {
            input: Arc::default(),
            add_button: Arc::default(),
            stock_list: Arc::default(),
            listen_button: Arc::new(RecordingTrigger::idle()),
            results: Arc::default(),
            alerts: Arc::default(),
        }
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
