//! User actions and the queries they turn into.

use crate::model::{LOCATION_PLACEHOLDER, LocationQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Search button or Enter with some text.
    Submit(String),
    /// "Use my location".
    Geolocate,
    /// Reload whatever location is on screen.
    Refresh,
}

/// Query for a submitted search box, `None` when it is blank.
pub fn submit_query(text: &str) -> Option<LocationQuery> {
    let text = text.trim();
    (!text.is_empty()).then(|| LocationQuery::place(text))
}

/// Query for a refresh of the displayed location, `None` before anything loaded.
pub fn refresh_query(displayed_location: &str) -> Option<LocationQuery> {
    let text = displayed_location.trim();
    (!text.is_empty() && text != LOCATION_PLACEHOLDER).then(|| LocationQuery::place(text))
}

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptLine {
    Trigger(Trigger),
    Quit,
    Help,
}

impl PromptLine {
    /// `:geo`, `:refresh`, `:quit` and `:help` are commands; an empty line
    /// refreshes; anything else is a search.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" | ":r" | ":refresh" => PromptLine::Trigger(Trigger::Refresh),
            ":g" | ":geo" | ":locate" => PromptLine::Trigger(Trigger::Geolocate),
            ":q" | ":quit" | ":exit" => PromptLine::Quit,
            ":h" | ":help" | "?" => PromptLine::Help,
            _ => PromptLine::Trigger(Trigger::Submit(line.to_string())),
        }
    }
}
