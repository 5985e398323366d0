use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{model::Coordinates, source::SourceKind};

pub const DEFAULT_LOCATION: &str = "Cairo";
pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline/";

/// Settings for the Visual Crossing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Per-request timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string(), timeout_secs: 10 }
    }
}

/// Settings for the offline mock backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Simulated latency before the mock answers.
    pub delay_ms: u64,
    /// Overrides the mock's observation time, e.g. `"23:00:00"`.
    pub observed_at: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { delay_ms: 1000, observed_at: None }
    }
}

/// Where "use my location" points to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub enabled: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self { enabled: true, latitude: None, longitude: None }
    }
}

impl GeolocationConfig {
    pub fn position(&self) -> Option<Coordinates> {
        Some(Coordinates { latitude: self.latitude?, longitude: self.longitude? })
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// source = "live"
/// default_location = "Lisbon"
///
/// [live]
/// api_key = "..."
///
/// [geolocation]
/// latitude = 38.72
/// longitude = -9.14
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit backend, "live" or "mock". Unset picks live when a key exists.
    pub source: Option<String>,
    pub default_location: String,
    pub live: LiveConfig,
    pub mock: MockConfig,
    pub geolocation: GeolocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            default_location: DEFAULT_LOCATION.to_string(),
            live: LiveConfig::default(),
            mock: MockConfig::default(),
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// Resolve which backend to use.
    pub fn source_kind(&self) -> Result<SourceKind> {
        match self.source.as_deref() {
            Some(s) => SourceKind::try_from(s),
            None if self.api_key().is_some() => Ok(SourceKind::LiveHttp),
            None => Ok(SourceKind::Mock),
        }
    }

    pub fn set_source(&mut self, kind: SourceKind) {
        self.source = Some(kind.as_str().to_string());
    }

    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.live.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.live.api_key = Some(api_key);
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.live.timeout_secs > 0).then(|| Duration::from_secs(self.live.timeout_secs))
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nowcast", "nowcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_mock_without_key() {
        let cfg = Config::default();
        assert_eq!(cfg.source_kind().unwrap(), SourceKind::Mock);
        assert_eq!(cfg.default_location, "Cairo");
    }

    #[test]
    fn key_implies_live_source() {
        let mut cfg = Config::default();
        cfg.set_api_key("VC_KEY".into());

        assert_eq!(cfg.source_kind().unwrap(), SourceKind::LiveHttp);
        assert_eq!(cfg.api_key(), Some("VC_KEY"));
    }

    #[test]
    fn blank_key_is_not_a_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.source_kind().unwrap(), SourceKind::Mock);
    }

    #[test]
    fn explicit_source_wins() {
        let mut cfg = Config::default();
        cfg.set_api_key("VC_KEY".into());
        cfg.set_source(SourceKind::Mock);

        assert_eq!(cfg.source_kind().unwrap(), SourceKind::Mock);
    }

    #[test]
    fn unknown_source_errors() {
        let cfg = Config { source: Some("carrier-pigeon".into()), ..Config::default() };
        let err = cfg.source_kind().unwrap_err();
        assert!(err.to_string().contains("Unknown weather source"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = Config::from_toml(
            r#"
            default_location = "Lisbon"

            [live]
            api_key = "abc"

            [geolocation]
            latitude = 38.72
            longitude = -9.14
            "#,
        )
        .unwrap();

        assert_eq!(cfg.default_location, "Lisbon");
        assert_eq!(cfg.live.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.live.timeout_secs, 10);
        assert_eq!(cfg.mock.delay_ms, 1000);
        assert!(cfg.geolocation.enabled);
        assert_eq!(
            cfg.geolocation.position(),
            Some(Coordinates { latitude: 38.72, longitude: -9.14 })
        );
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_source(SourceKind::LiveHttp);
        cfg.set_api_key("KEY".into());
        cfg.mock.observed_at = Some("23:00:00".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let mut cfg = Config::default();
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(10)));

        cfg.live.timeout_secs = 0;
        assert_eq!(cfg.request_timeout(), None);
    }
}
