//! Core library for the `nowcast` weather client.
//!
//! This crate defines:
//! - The snapshot model and the rolling 24-hour forecast window
//! - The loading / content / error display state machine
//! - Weather sources (Visual Crossing over HTTP, and an offline mock)
//! - Configuration, geolocation, input triggers and text rendering
//!
//! It is used by `nowcast-cli`, but the pipeline in [`App`] works with any
//! [`Renderer`].

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod geo;
pub mod input;
pub mod model;
pub mod render;
pub mod source;
pub mod window;

pub use app::App;
pub use config::Config;
pub use display::{DisplayState, DisplayStateMachine, Region, RequestTicket};
pub use error::{FetchError, GeoError, WindowError};
pub use geo::{ConfiguredLocator, Geolocator};
pub use input::{PromptLine, Trigger};
pub use model::{LocationQuery, WeatherSnapshot};
pub use render::{Renderer, TextRenderer};
pub use source::{SourceKind, WeatherSource};
pub use window::{ForecastWindow, build_window};
