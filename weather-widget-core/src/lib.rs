//! Core library for the `weather-widget` binary.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com provider behind a small trait
//! - The widget state machine and the async runtime that drives it
//!
//! It is used by `weather-widget-cli`, but the widget can be embedded in any
//! front end that can feed it actions and render its lines.

pub mod config;
pub mod model;
pub mod provider;
pub mod runtime;
pub mod widget;

pub use config::{Config, ConfigError};
pub use model::{FetchStatus, Reading, RequestId, Temperature};
pub use provider::{FetchError, WeatherProvider, provider_from_config};
pub use runtime::WidgetRuntime;
pub use widget::{Action, Effect, WeatherWidget};
