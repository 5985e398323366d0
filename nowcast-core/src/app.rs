//! The fetch pipeline: trigger, fetch, then window assembly and paint.

use std::time::Duration;

use crate::{
    display::{Completion, DisplayState, DisplayStateMachine, RequestTicket},
    error::FetchError,
    geo::Geolocator,
    input::{Trigger, refresh_query, submit_query},
    model::{LocationQuery, WeatherSnapshot},
    render::Renderer,
    source::WeatherSource,
};

/// Owns the display slot and everything that feeds it.
///
/// [`App::handle`] takes `&mut self` and runs each query to completion, so a
/// new query can never supersede one in flight here. The ticket check in
/// [`DisplayStateMachine::complete`] only matters to callers that drive the
/// machine from concurrent tasks.
#[derive(Debug)]
pub struct App<R: Renderer> {
    machine: DisplayStateMachine,
    source: Box<dyn WeatherSource>,
    locator: Box<dyn Geolocator>,
    renderer: R,
    timeout: Option<Duration>,
}

impl<R: Renderer> App<R> {
    pub fn new(
        source: Box<dyn WeatherSource>,
        locator: Box<dyn Geolocator>,
        renderer: R,
        timeout: Option<Duration>,
    ) -> Self {
        Self { machine: DisplayStateMachine::new(), source, locator, renderer, timeout }
    }

    pub fn state(&self) -> &DisplayState {
        self.machine.state()
    }

    pub fn machine(&self) -> &DisplayStateMachine {
        &self.machine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Startup fetch for the default location.
    pub async fn start(&mut self, default_location: &str) -> &DisplayState {
        self.renderer.paint(self.machine.state());
        self.handle(Trigger::Submit(default_location.to_string())).await;
        self.machine.state()
    }

    /// Runs one trigger to completion. Returns `false` if it was a no-op.
    pub async fn handle(&mut self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Submit(text) => match submit_query(&text) {
                Some(query) => self.search(query).await,
                None => {
                    tracing::debug!("ignoring empty search");
                    return false;
                }
            },
            Trigger::Refresh => match refresh_query(self.machine.displayed_location()) {
                Some(query) => self.search(query).await,
                None => {
                    tracing::debug!("nothing displayed yet, refresh ignored");
                    return false;
                }
            },
            Trigger::Geolocate => self.geolocate().await,
        }
        true
    }

    async fn search(&mut self, query: LocationQuery) {
        let ticket = self.begin();
        let result = self.fetch(&query).await;
        self.complete(ticket, result);
    }

    async fn geolocate(&mut self) {
        let ticket = self.begin();
        let result = match self.locator.current_position().await {
            Ok(position) => self.fetch(&position.into()).await,
            Err(err) => Err(err.into()),
        };
        self.complete(ticket, result);
    }

    fn begin(&mut self) -> RequestTicket {
        let ticket = self.machine.begin();
        self.renderer.paint(self.machine.state());
        ticket
    }

    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        tracing::info!(%query, "fetching weather");

        let fetch = self.source.fetch(query);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .unwrap_or(Err(FetchError::Timeout)),
            None => fetch.await,
        };

        if let Ok(snapshot) = &result {
            tracing::info!(location = %snapshot.resolved_location, "weather fetched");
        }
        result
    }

    fn complete(&mut self, ticket: RequestTicket, result: Result<WeatherSnapshot, FetchError>) {
        if let Completion::Applied(_) = self.machine.complete(ticket, result) {
            self.renderer.paint(self.machine.state());
        }
    }
}
