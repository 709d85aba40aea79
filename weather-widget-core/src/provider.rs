use crate::{Config, Temperature, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Why a lookup produced no temperature.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to send request to WeatherAPI.com: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("WeatherAPI request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse WeatherAPI JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("WeatherAPI response did not contain current.temp_c")]
    MissingTemperature,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current temperature for a free-text city query.
    async fn current_temperature(&self, city: &str) -> Result<Temperature, FetchError>;
}

/// Construct the WeatherAPI provider from config. Fails if no API key is set.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = WeatherApiProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
