use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{Config, Temperature};

use super::{FetchError, WeatherProvider};

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        let http = Client::builder().timeout(config.timeout()?).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: Option<WaCurrent>,
}

/// Extract `current.temp_c` from a `current.json` body.
fn parse_current(body: &str) -> Result<Temperature, FetchError> {
    let parsed: WaResponse = serde_json::from_str(body).map_err(FetchError::Decode)?;

    parsed
        .current
        .and_then(|c| c.temp_c)
        .map(Temperature::from_celsius)
        .ok_or(FetchError::MissingTemperature)
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current_temperature(&self, city: &str) -> Result<Temperature, FetchError> {
        debug!(city = %city, "requesting current conditions");

        let res = self
            .http
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_current(&body)
    }
}

// reqwest puts the full URL, API key included, into its error text.
fn transport_error(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.without_url())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_temp_c_and_ignores_other_fields() {
        let body = r#"{"location":{"name":"Auckland"},"current":{"temp_c":18.5,"humidity":72}}"#;
        assert_eq!(parse_current(body).unwrap(), Temperature::from_celsius(18.5));
    }

    #[test]
    fn integer_temperature_is_accepted() {
        let body = r#"{"current":{"temp_c":-4}}"#;
        assert_eq!(parse_current(body).unwrap().celsius(), -4.0);
    }

    #[test]
    fn missing_current_is_reported() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        assert!(matches!(parse_current(body), Err(FetchError::MissingTemperature)));
    }

    #[test]
    fn missing_temp_c_is_reported() {
        assert!(matches!(
            parse_current(r#"{"current":{}}"#),
            Err(FetchError::MissingTemperature)
        ));
    }

    #[test]
    fn non_numeric_temp_c_is_a_decode_error() {
        assert!(matches!(
            parse_current(r#"{"current":{"temp_c":"warm"}}"#),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(parse_current("<html>"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: "http://localhost:1234/".into(),
            ..Default::default()
        };
        let provider = WeatherApiProvider::from_config(&cfg).unwrap();
        assert_eq!(provider.current_url(), "http://localhost:1234/v1/current.json");
    }

    #[test]
    fn zero_timeout_is_rejected_at_construction() {
        let cfg = Config { api_key: Some("KEY".into()), timeout_secs: 0, ..Default::default() };
        let err = WeatherApiProvider::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be at least 1"));
    }
}
