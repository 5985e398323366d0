//! "Use my location" for a terminal client.
//!
//! There is no device API to ask, so the position is whatever the user put
//! in the `[geolocation]` config section.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{config::GeolocationConfig, error::GeoError, model::Coordinates};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeoError>;
}

#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocator {
    enabled: bool,
    position: Option<Coordinates>,
}

impl ConfiguredLocator {
    pub fn new(enabled: bool, position: Option<Coordinates>) -> Self {
        Self { enabled, position }
    }

    pub fn from_config(config: &GeolocationConfig) -> Self {
        Self::new(config.enabled, config.position())
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocator {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        if !self.enabled {
            return Err(GeoError::PermissionDenied);
        }
        self.position.ok_or(GeoError::Unsupported)
    }
}
