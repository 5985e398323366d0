//! Offline backend: a fixed two-day dataset that needs no network or key.

use async_trait::async_trait;
use std::{f64::consts::PI, time::Duration};

use crate::{
    error::FetchError,
    model::{CurrentConditions, DayForecast, HourForecast, LocationQuery, WeatherSnapshot},
};

use super::WeatherSource;

const MOCK_OBSERVED_AT: &str = "14:00:00";
/// Hour of the daily temperature peak.
const PEAK_HOUR: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct MockSource {
    delay: Duration,
    observed_at: String,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl MockSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay, observed_at: MOCK_OBSERVED_AT.to_string() }
    }

    pub fn with_observed_at(mut self, observed_at: impl Into<String>) -> Self {
        self.observed_at = observed_at.into();
        self
    }

    /// The snapshot this source returns for `query`, without the delay.
    pub fn snapshot_for(&self, query: &LocationQuery) -> WeatherSnapshot {
        WeatherSnapshot {
            resolved_location: capitalize_first(&query.as_query_string()),
            current: CurrentConditions {
                temperature_c: 24.0,
                condition_text: "Partially cloudy".to_string(),
                wind_speed_kmh: 12.0,
                humidity_percent: 45.0,
                precip_prob_percent: 0.0,
                observed_at: self.observed_at.clone(),
            },
            days: vec![
                mock_day(19.0, 28.0, |i| if i > 6 && i < 18 { "Sunny" } else { "Clear" }),
                mock_day(20.0, 29.0, |_| "Sunny"),
            ],
        }
    }
}

#[async_trait]
impl WeatherSource for MockSource {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.snapshot_for(query))
    }
}

fn mock_day(min: f64, max: f64, condition: impl Fn(u32) -> &'static str) -> DayForecast {
    let hours = (0..24)
        .map(|i| {
            // cosine curve: min twelve hours from the peak, max at PEAK_HOUR
            let phase = (f64::from(i) - PEAK_HOUR) * 2.0 * PI / 24.0;
            let temp = min + (max - min) * (1.0 + phase.cos()) / 2.0;
            HourForecast::new(i, (temp * 10.0).round() / 10.0, condition(i))
        })
        .collect();

    DayForecast { temp_max_c: max, temp_min_c: min, hours }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::build_window;

    #[tokio::test]
    async fn mock_is_deterministic() {
        let source = MockSource::default();
        let query = LocationQuery::place("cairo");

        let a = source.fetch(&query).await.unwrap();
        let b = source.fetch(&query).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.resolved_location, "Cairo");
        assert_eq!(a.current.observed_at, "14:00:00");
    }

    #[test]
    fn mock_days_cover_full_hours() {
        let snap = MockSource::default().snapshot_for(&LocationQuery::place("x"));

        assert_eq!(snap.days.len(), 2);
        for day in &snap.days {
            assert_eq!(day.hours.len(), 24);
            for (i, hour) in day.hours.iter().enumerate() {
                assert_eq!(hour.hour(), Some(i as u32));
                assert!(hour.temperature_c >= day.temp_min_c);
                assert!(hour.temperature_c <= day.temp_max_c);
            }
        }
        assert_eq!(snap.days[0].hours[7].condition_text, "Sunny");
        assert_eq!(snap.days[0].hours[18].condition_text, "Clear");
        assert_eq!(snap.days[0].hours[15].temperature_c, 28.0);
    }

    #[test]
    fn coordinates_query_keeps_numeric_label() {
        let query = LocationQuery::Coordinates { latitude: 30.5, longitude: 31.25 };
        let snap = MockSource::default().snapshot_for(&query);
        assert_eq!(snap.resolved_location, "30.5,31.25");
    }

    #[test]
    fn observed_override_feeds_window() {
        let snap = MockSource::default()
            .with_observed_at("23:00:00")
            .snapshot_for(&LocationQuery::place("oslo"));
        let window = build_window(&snap).unwrap();

        assert_eq!(window.from_today(), 0);
        assert_eq!(window.hours(), snap.days[1].hours.as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_simulated() {
        let source = MockSource::new(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();

        source.fetch(&LocationQuery::place("rome")).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
