use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::FetchError,
    model::{CurrentConditions, DayForecast, HourForecast, LocationQuery, WeatherSnapshot},
};

use super::WeatherSource;

/// Visual Crossing Timeline API backend.
#[derive(Debug, Clone)]
pub struct VisualCrossingSource {
    api_key: String,
    base_url: Url,
    http: Client,
}

impl VisualCrossingSource {
    pub fn new(base_url: &str, api_key: String, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid weather base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Weather base URL cannot take a location path: {base_url}"));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { api_key, base_url, http })
    }

    /// `{base}/{location}`, with the location as one percent-encoded segment.
    fn timeline_url(&self, location: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(location);
        }
        url
    }
}

#[async_trait]
impl WeatherSource for VisualCrossingSource {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError> {
        let location = query.as_query_string();
        let url = self.timeline_url(&location);

        tracing::info!(%location, "requesting timeline from Visual Crossing");

        let res = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", "metric"),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let body = truncate_body(&body);
            tracing::warn!(%status, %body, "Visual Crossing request failed");
            return Err(FetchError::Http { status: status.as_u16(), body });
        }

        decode_snapshot(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcResponse {
    resolved_address: String,
    current_conditions: VcCurrent,
    days: Vec<VcDay>,
}

#[derive(Debug, Deserialize)]
struct VcCurrent {
    #[serde(default)]
    temp: Option<f64>,
    #[serde(default)]
    conditions: Option<String>,
    #[serde(default)]
    windspeed: Option<f64>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default, alias = "preciprob")]
    precipprob: Option<f64>,
    datetime: String,
}

#[derive(Debug, Deserialize)]
struct VcDay {
    #[serde(default)]
    tempmax: Option<f64>,
    #[serde(default)]
    tempmin: Option<f64>,
    #[serde(default)]
    hours: Vec<VcHour>,
}

#[derive(Debug, Deserialize)]
struct VcHour {
    datetime: String,
    #[serde(default)]
    temp: Option<f64>,
    #[serde(default)]
    conditions: Option<String>,
}

/// Decode a Timeline JSON body. Nullable numbers read as 0.
pub fn decode_snapshot(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let parsed: VcResponse = serde_json::from_str(body)?;

    let current = parsed.current_conditions;
    let days = parsed
        .days
        .into_iter()
        .map(|day| DayForecast {
            temp_max_c: day.tempmax.unwrap_or_default(),
            temp_min_c: day.tempmin.unwrap_or_default(),
            hours: day
                .hours
                .into_iter()
                .map(|h| HourForecast {
                    time_of_day: h.datetime,
                    temperature_c: h.temp.unwrap_or_default(),
                    condition_text: h.conditions.unwrap_or_default(),
                })
                .collect(),
        })
        .collect();

    Ok(WeatherSnapshot {
        resolved_location: parsed.resolved_address,
        current: CurrentConditions {
            temperature_c: current.temp.unwrap_or_default(),
            condition_text: current.conditions.unwrap_or_default(),
            wind_speed_kmh: current.windspeed.unwrap_or_default(),
            humidity_percent: current.humidity.unwrap_or_default(),
            precip_prob_percent: current.precipprob.unwrap_or_default(),
            observed_at: current.datetime,
        },
        days,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const SAMPLE: &str = r#"{
        "queryCost": 1,
        "resolvedAddress": "Cairo, Egypt",
        "timezone": "Africa/Cairo",
        "currentConditions": {
            "datetime": "14:00:00",
            "temp": 24.3,
            "conditions": "Partially cloudy",
            "windspeed": 12.2,
            "humidity": 45.1,
            "precipprob": null
        },
        "days": [
            {
                "datetime": "2026-10-19",
                "tempmax": 28.0,
                "tempmin": 19.0,
                "hours": [
                    {"datetime": "00:00:00", "temp": 20.1, "conditions": "Clear"},
                    {"datetime": "01:00:00", "temp": 19.8, "conditions": "Clear"}
                ]
            },
            {
                "datetime": "2026-10-20",
                "tempmax": 29.0,
                "tempmin": null,
                "hours": []
            }
        ]
    }"#;

    fn source() -> VisualCrossingSource {
        VisualCrossingSource::new(crate::config::DEFAULT_BASE_URL, "KEY".into(), None).unwrap()
    }

    #[test]
    fn decodes_timeline_body() {
        let snap = decode_snapshot(SAMPLE).unwrap();

        assert_eq!(snap.resolved_location, "Cairo, Egypt");
        assert_eq!(snap.current.observed_at, "14:00:00");
        assert_eq!(snap.current.temperature_c, 24.3);
        assert_eq!(snap.current.precip_prob_percent, 0.0);
        assert_eq!(snap.days.len(), 2);
        assert_eq!(snap.days[0].hours[1].hour(), Some(1));
        assert_eq!(snap.days[0].hours[1].condition_text, "Clear");
        assert_eq!(snap.days[1].temp_min_c, 0.0);
    }

    #[test]
    fn accepts_misspelled_precip_field() {
        let body = SAMPLE.replace("\"precipprob\": null", "\"preciprob\": 30");
        let snap = decode_snapshot(&body).unwrap();
        assert_eq!(snap.current.precip_prob_percent, 30.0);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = decode_snapshot("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let err = decode_snapshot(r#"{"resolvedAddress": "x"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn location_is_a_single_encoded_segment() {
        let url = source().timeline_url("New York, NY");
        assert_eq!(
            url.as_str(),
            "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/New%20York,%20NY"
        );

        let url = source().timeline_url("30.04,31.24");
        assert!(url.path().ends_with("/timeline/30.04,31.24"));
    }

    #[test]
    fn base_without_trailing_slash() {
        let src = VisualCrossingSource::new("http://localhost:9000/timeline", "KEY".into(), None)
            .unwrap();
        assert_eq!(src.timeline_url("Oslo").as_str(), "http://localhost:9000/timeline/Oslo");
    }

    #[test]
    fn truncate_body_limits_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(150);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    /// Answers one request on a loopback port and returns a base URL for it.
    async fn serve_once(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/timeline/")
    }

    fn source_at(base_url: &str) -> VisualCrossingSource {
        VisualCrossingSource::new(base_url, "KEY".into(), Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn error_status_becomes_http_error() {
        let base = serve_once("400 Bad Request", "Bad API Request").await;

        let err = source_at(&base).fetch(&LocationQuery::place("Atlantis")).await.unwrap_err();

        match err {
            FetchError::Http { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "Bad API Request");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_body_is_truncated() {
        let long = "e".repeat(500);
        let base = serve_once("500 Internal Server Error", &long).await;

        let err = source_at(&base).fetch(&LocationQuery::place("Cairo")).await.unwrap_err();

        match err {
            FetchError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), 203);
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_status_is_decoded() {
        let base = serve_once("200 OK", SAMPLE).await;

        let snap = source_at(&base).fetch(&LocationQuery::place("Cairo")).await.unwrap();

        assert_eq!(snap.resolved_location, "Cairo, Egypt");
        assert_eq!(snap.days.len(), 2);
    }

    #[tokio::test]
    async fn success_with_garbage_body_is_decode_error() {
        let base = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = source_at(&base).fetch(&LocationQuery::place("Cairo")).await.unwrap_err();

        assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn closed_port_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source_at(&format!("http://{addr}/timeline/"))
            .fetch(&LocationQuery::place("Cairo"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }
}
