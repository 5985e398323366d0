use crate::{
    Config,
    error::FetchError,
    model::{LocationQuery, WeatherSnapshot},
    source::{mock::MockSource, visualcrossing::VisualCrossingSource},
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod mock;
pub mod visualcrossing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    LiveHttp,
    Mock,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::LiveHttp => "live",
            SourceKind::Mock => "mock",
        }
    }

    pub const fn all() -> &'static [SourceKind] {
        &[SourceKind::LiveHttp, SourceKind::Mock]
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "live" | "http" | "visualcrossing" => Ok(SourceKind::LiveHttp),
            "mock" => Ok(SourceKind::Mock),
            _ => Err(anyhow::anyhow!(
                "Unknown weather source '{value}'. Supported sources: live, mock."
            )),
        }
    }
}

/// Something that turns a location query into a weather snapshot.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct a source from config and an explicit kind.
pub fn source_from_config(
    kind: SourceKind,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherSource>> {
    let boxed: Box<dyn WeatherSource> = match kind {
        SourceKind::LiveHttp => {
            let api_key = config.api_key().ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for the live weather source.\n\
                     Hint: run `nowcast configure` and enter your Visual Crossing key, \
                     or pass `--source mock`."
                )
            })?;
            Box::new(VisualCrossingSource::new(
                &config.live.base_url,
                api_key.to_owned(),
                config.request_timeout(),
            )?)
        }
        SourceKind::Mock => {
            tracing::warn!("using mock weather data; configure an API key for live data");
            let mut mock = MockSource::new(Duration::from_millis(config.mock.delay_ms));
            if let Some(observed_at) = &config.mock.observed_at {
                mock = mock.with_observed_at(observed_at.clone());
            }
            Box::new(mock)
        }
    };

    Ok(boxed)
}

/// Construct the source the config selects.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let kind = config.source_kind()?;
    source_from_config(kind, config)
}
