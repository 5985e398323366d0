use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown in the location label before anything has loaded.
pub const LOCATION_PLACEHOLDER: &str = "--";

/// What the user asked weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    pub fn place(text: impl Into<String>) -> Self {
        LocationQuery::Place(text.into())
    }

    /// Wire form sent to a source: the free text, or `"<lat>,<lon>"`.
    pub fn as_query_string(&self) -> String {
        match self {
            LocationQuery::Place(text) => text.clone(),
            LocationQuery::Coordinates { latitude, longitude } => {
                format!("{latitude},{longitude}")
            }
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_query_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for LocationQuery {
    fn from(c: Coordinates) -> Self {
        LocationQuery::Coordinates { latitude: c.latitude, longitude: c.longitude }
    }
}

/// One fetched weather payload for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub resolved_location: String,
    pub current: CurrentConditions,
    /// Index 0 is today, index 1 is tomorrow.
    pub days: Vec<DayForecast>,
}

impl WeatherSnapshot {
    /// Short label for the location: everything before the first comma.
    pub fn city_name(&self) -> &str {
        self.resolved_location.split(',').next().unwrap_or_default().trim()
    }

    pub fn today(&self) -> Option<&DayForecast> {
        self.days.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub condition_text: String,
    pub wind_speed_kmh: f64,
    pub humidity_percent: f64,
    pub precip_prob_percent: f64,
    /// Provider's local time string, e.g. `"14:00:00"`.
    pub observed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    /// 24 entries, index `i` is hour `i:00:00`.
    pub hours: Vec<HourForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourForecast {
    pub time_of_day: String,
    pub temperature_c: f64,
    pub condition_text: String,
}

impl HourForecast {
    pub fn new(hour: u32, temperature_c: f64, condition_text: impl Into<String>) -> Self {
        Self {
            time_of_day: format!("{hour}:00:00"),
            temperature_c,
            condition_text: condition_text.into(),
        }
    }

    /// Hour index parsed from the text before the first `:`.
    pub fn hour(&self) -> Option<u32> {
        leading_hour(&self.time_of_day)
    }

    /// `"HH:MM"` label for the forecast strip.
    pub fn clock_label(&self) -> String {
        let mut parts = self.time_of_day.split(':');
        let hours = parts.next().unwrap_or_default();
        let minutes = parts.next().unwrap_or("00");
        format!("{hours}:{minutes}")
    }
}

/// Parses the integer before the first `:` of a time-of-day string.
pub(crate) fn leading_hour(time: &str) -> Option<u32> {
    time.split(':').next()?.trim().parse().ok()
}
