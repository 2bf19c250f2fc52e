//! Event subscription table
//!
//! Wiring between page events and controller actions is data, built once by
//! [`EventTable::standard`]. Hosts (and tests) feed raw events through
//! [`EventTable::resolve`] instead of attaching closures to elements.

/// Page elements a host can raise events on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    StockInput,
    AddButton,
    StockList,
    ListenButton,
    ResultsSection,
}

impl ElementId {
    /// Element id in the host page
    pub fn dom_id(self) -> &'static str {
        match self {
            ElementId::StockInput => "stockInput",
            ElementId::AddButton => "addBtn",
            ElementId::StockList => "stockList",
            ElementId::ListenButton => "listenBtn",
            ElementId::ResultsSection => "resultsSection",
        }
    }
}

/// Keyboard keys the controllers care about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Character(char),
}

/// A raw event raised by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UiEvent {
    Click,
    KeyPress(Key),
}

/// Controller operation an event maps to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read the stock input and add it to the watchlist
    AddStock,
    /// Remove one symbol from the watchlist
    RemoveStock(String),
    /// Start an analysis run
    AnalyzeMarket,
}

/// One `{element, event} -> action` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub element: ElementId,
    pub event: UiEvent,
    pub action: Action,
}

/// Ordered set of subscriptions
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    subscriptions: Vec<Subscription>,
}

impl EventTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The page's wiring: add on click or Enter, listen on click
    pub fn standard() -> Self {
        Self::new()
            .subscribe(ElementId::AddButton, UiEvent::Click, Action::AddStock)
            .subscribe(
                ElementId::StockInput,
                UiEvent::KeyPress(Key::Enter),
                Action::AddStock,
            )
            .subscribe(ElementId::ListenButton, UiEvent::Click, Action::AnalyzeMarket)
    }

    /// Add a row
    pub fn subscribe(mut self, element: ElementId, event: UiEvent, action: Action) -> Self {
        self.subscriptions.push(Subscription {
            element,
            event,
            action,
        });
        self
    }

    /// Action bound to `event` on `element`, if any
    pub fn resolve(&self, element: ElementId, event: &UiEvent) -> Option<&Action> {
        self.subscriptions
            .iter()
            .find(|sub| sub.element == element && &sub.event == event)
            .map(|sub| &sub.action)
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_wiring() {
        let table = EventTable::standard();
        assert_eq!(table.subscriptions().len(), 3);

        assert_eq!(
            table.resolve(ElementId::AddButton, &UiEvent::Click),
            Some(&Action::AddStock)
        );
        assert_eq!(
            table.resolve(ElementId::StockInput, &UiEvent::KeyPress(Key::Enter)),
            Some(&Action::AddStock)
        );
        assert_eq!(
            table.resolve(ElementId::ListenButton, &UiEvent::Click),
            Some(&Action::AnalyzeMarket)
        );
    }

    #[test]
    fn test_other_keys_are_unbound() {
        let table = EventTable::standard();
        assert!(table
            .resolve(ElementId::StockInput, &UiEvent::KeyPress(Key::Character('a')))
            .is_none());
        assert!(table
            .resolve(ElementId::StockInput, &UiEvent::KeyPress(Key::Escape))
            .is_none());
        assert!(table.resolve(ElementId::ResultsSection, &UiEvent::Click).is_none());
    }

    #[test]
    fn test_dom_ids() {
        assert_eq!(ElementId::StockInput.dom_id(), "stockInput");
        assert_eq!(ElementId::ListenButton.dom_id(), "listenBtn");
    }
}
