//! Text presentation of a [`DisplayState`].

use chrono::{Local, NaiveDate};
use std::io::{self, Write as _};

use crate::{
    display::DisplayState,
    model::{HourForecast, WeatherSnapshot},
    window::ForecastWindow,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub trait Renderer {
    /// Replace whatever is on screen with `state`.
    fn paint(&mut self, state: &DisplayState);
}

/// Pure frame for `state`; `today` fills the date line.
pub fn render(state: &DisplayState, today: NaiveDate) -> String {
    match state {
        DisplayState::Loading => "Loading weather...\n".to_string(),
        DisplayState::Error { message } => {
            format!("! {message}\n\nSearch again to retry.\n")
        }
        DisplayState::Content { snapshot, window } => render_content(snapshot, window, today),
    }
}

fn render_content(snapshot: &WeatherSnapshot, window: &ForecastWindow, today: NaiveDate) -> String {
    let current = &snapshot.current;

    let mut out = format!(
        "{}\n{}\n\n  {}°  {}\n",
        snapshot.city_name(),
        today.format("%A, %B %-d"),
        whole(current.temperature_c),
        current.condition_text,
    );
    if let Some(day) = snapshot.today() {
        out.push_str(&format!("  H:{}°  L:{}°\n", whole(day.temp_max_c), whole(day.temp_min_c)));
    }
    out.push_str(&format!(
        "  Wind {} km/h | Humidity {}% | Rain {}%\n\nNext 24 hours\n",
        current.wind_speed_kmh,
        whole(current.humidity_percent),
        current.precip_prob_percent,
    ));

    for (i, hour) in window.hours().iter().enumerate() {
        if i == window.from_today() {
            out.push_str("  -- tomorrow --\n");
        }
        out.push_str(&hour_card(hour));
        out.push('\n');
    }

    out
}

fn hour_card(hour: &HourForecast) -> String {
    format!("  {:>5}  {:>4}°  {}", hour.clock_label(), whole(hour.temperature_c), hour.condition_text)
}

fn whole(value: f64) -> i64 {
    value.round() as i64
}

/// Paints frames to any writer, clearing the previous one first.
#[derive(Debug)]
pub struct TextRenderer<W: io::Write> {
    out: W,
    clear: bool,
}

impl TextRenderer<io::Stdout> {
    pub fn stdout(clear: bool) -> Self {
        Self::new(io::stdout(), clear)
    }
}

impl<W: io::Write> TextRenderer<W> {
    pub fn new(out: W, clear: bool) -> Self {
        Self { out, clear }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Renderer for TextRenderer<W> {
    fn paint(&mut self, state: &DisplayState) {
        let frame = render(state, Local::now().date_naive());
        let prefix = if self.clear { CLEAR_SCREEN } else { "" };

        if let Err(err) = write!(self.out, "{prefix}{frame}").and_then(|()| self.out.flush()) {
            tracing::error!(error = %err, "failed to paint frame");
        }
    }
}
