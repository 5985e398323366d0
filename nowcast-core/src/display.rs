//! Which UI region is visible: loading, content or error.

use crate::{
    error::FetchError,
    model::{LOCATION_PLACEHOLDER, WeatherSnapshot},
    window::{ForecastWindow, build_window},
};

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Loading,
    Content { snapshot: WeatherSnapshot, window: ForecastWindow },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Loading,
    Content,
    Error,
}

impl DisplayState {
    pub fn region(&self) -> Region {
        match self {
            DisplayState::Loading => Region::Loading,
            DisplayState::Content { .. } => Region::Content,
            DisplayState::Error { .. } => Region::Error,
        }
    }
}

/// Handle for one issued request. Only the most recent ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Outcome of handing a result to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied(Region),
    Stale,
}

/// Single process-wide display slot.
///
/// Starts in `Loading` because a fetch for the default location is issued on
/// startup. Every new query goes through [`DisplayStateMachine::begin`], and
/// a result only lands if it answers the latest ticket.
#[derive(Debug)]
pub struct DisplayStateMachine {
    state: DisplayState,
    issued: u64,
    displayed_location: String,
}

impl Default for DisplayStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayStateMachine {
    pub fn new() -> Self {
        Self {
            state: DisplayState::Loading,
            issued: 0,
            displayed_location: LOCATION_PLACEHOLDER.to_string(),
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn active_region(&self) -> Region {
        self.state.region()
    }

    /// City label of the last snapshot shown, or `"--"` if none yet.
    pub fn displayed_location(&self) -> &str {
        &self.displayed_location
    }

    /// Enters `Loading` for a new query and returns its ticket.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        self.state = DisplayState::Loading;
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Lands a fetch outcome. Successful snapshots go through the window builder.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<WeatherSnapshot, FetchError>,
    ) -> Completion {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale weather response"
            );
            return Completion::Stale;
        }

        self.state = match result {
            Ok(snapshot) => match build_window(&snapshot) {
                Ok(window) => {
                    self.displayed_location = snapshot.city_name().to_string();
                    DisplayState::Content { snapshot, window }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "snapshot rejected by window builder");
                    DisplayState::Error { message: err.user_message() }
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "weather fetch failed");
                DisplayState::Error { message: err.user_message() }
            }
        };

        Completion::Applied(self.state.region())
    }
}
