//! Rolling 24-hour forecast window.
//!
//! Providers bucket hourly data by calendar day. The hourly strip instead
//! shows the next 24 hours, so the window is stitched together from the
//! rest of today and the start of tomorrow.

use crate::{
    error::WindowError,
    model::{HourForecast, WeatherSnapshot, leading_hour},
};

pub const WINDOW_HOURS: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastWindow {
    current_hour: u32,
    from_today: usize,
    hours: Vec<HourForecast>,
}

impl ForecastWindow {
    /// Hour the window starts after.
    pub fn current_hour(&self) -> u32 {
        self.current_hour
    }

    /// How many leading entries belong to today; the rest are tomorrow's.
    pub fn from_today(&self) -> usize {
        self.from_today
    }

    pub fn hours(&self) -> &[HourForecast] {
        &self.hours
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// True when tomorrow's data ran out before the window filled up.
    pub fn is_short(&self) -> bool {
        self.hours.len() < WINDOW_HOURS
    }
}

/// Parses the current hour out of an `"H:MM:SS"` observation time.
pub fn current_hour(observed_at: &str) -> Result<u32, WindowError> {
    let hour = leading_hour(observed_at).ok_or_else(|| WindowError::Parse(observed_at.to_string()))?;
    if hour > 23 {
        return Err(WindowError::HourOutOfRange(hour));
    }
    Ok(hour)
}

/// Builds the next-24-hours window that starts strictly after the current hour.
///
/// A short tomorrow truncates the window; nothing is padded.
pub fn build_window(snapshot: &WeatherSnapshot) -> Result<ForecastWindow, WindowError> {
    let h = current_hour(&snapshot.current.observed_at)?;

    let [today, tomorrow, ..] = snapshot.days.as_slice() else {
        return Err(WindowError::MissingDays(snapshot.days.len()));
    };

    let mut hours: Vec<HourForecast> =
        today.hours.iter().skip(h as usize + 1).take(WINDOW_HOURS).cloned().collect();
    let from_today = hours.len();

    let needed = WINDOW_HOURS - from_today;
    hours.extend(tomorrow.hours.iter().take(needed).cloned());

    if hours.len() < WINDOW_HOURS {
        tracing::debug!(
            have = hours.len(),
            tomorrow = tomorrow.hours.len(),
            "forecast window shorter than {WINDOW_HOURS} hours"
        );
    }

    Ok(ForecastWindow { current_hour: h, from_today, hours })
}
