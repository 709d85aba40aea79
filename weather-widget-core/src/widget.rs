//! The weather widget as a state machine: `(state, action) -> Option<Effect>`.
//!
//! The widget owns three pieces of UI state: the uncommitted input, the
//! active city and the last accepted temperature. It never performs IO
//! itself; lookups are requested through [`Effect::FetchCurrent`] and their
//! outcomes are fed back as actions tagged with the request id they answer.

use chrono::Utc;
use tracing::debug;

use crate::config::DEFAULT_CITY;
use crate::model::{FetchStatus, Reading, RequestId, Temperature};

/// Heading shown above the input.
pub const HEADING: &str = "Type in your city: ";

/// Label of the submit control.
pub const SUBMIT_LABEL: &str = "search!";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The widget was shown for the first time.
    Mount,

    /// The text in the input changed.
    InputChanged(String),

    /// The submit control was pressed.
    Submit,

    /// Result: lookup `id` returned a temperature.
    FetchDidLoad { id: RequestId, temperature: Temperature },

    /// Result: lookup `id` failed.
    FetchDidError { id: RequestId, reason: String },
}

/// Side effects requested by the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up the current temperature for `city`.
    FetchCurrent { id: RequestId, city: String },
}

#[derive(Debug, Clone)]
pub struct WeatherWidget {
    active_city: String,
    input: String,
    reading: Option<Reading>,
    status: FetchStatus,
    last_request: RequestId,
}

impl Default for WeatherWidget {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

impl WeatherWidget {
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            active_city: default_city.into(),
            input: String::new(),
            reading: None,
            status: FetchStatus::Idle,
            last_request: RequestId(0),
        }
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Mount => Some(self.begin_fetch()),

            Action::InputChanged(text) => {
                self.input = text;
                None
            }

            Action::Submit => {
                // The lookup is keyed on the city value: committing the same
                // city again does not issue a new request.
                if self.input == self.active_city {
                    return None;
                }
                self.active_city = self.input.clone();
                Some(self.begin_fetch())
            }

            Action::FetchDidLoad { id, temperature } => {
                if !self.is_current(id) {
                    debug!(%id, "discarding stale response");
                    return None;
                }
                self.reading = Some(Reading {
                    city: self.active_city.clone(),
                    temperature,
                    fetched_at: Utc::now(),
                });
                self.status = FetchStatus::Success(temperature);
                None
            }

            Action::FetchDidError { id, reason } => {
                if !self.is_current(id) {
                    debug!(%id, "discarding stale failure");
                    return None;
                }
                self.status = FetchStatus::Failed(reason);
                None
            }
        }
    }

    fn begin_fetch(&mut self) -> Effect {
        let id = self.last_request.next();
        self.last_request = id;
        self.status = FetchStatus::Fetching(id);
        debug!(%id, city = %self.active_city, "issuing lookup");
        Effect::FetchCurrent { id, city: self.active_city.clone() }
    }

    fn is_current(&self, id: RequestId) -> bool {
        self.status.pending() == Some(id)
    }

    pub fn active_city(&self) -> &str {
        &self.active_city
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn temperature(&self) -> Option<Temperature> {
        self.reading.as_ref().map(|r| r.temperature)
    }

    /// The last accepted reading, which may belong to a previous city.
    pub fn reading(&self) -> Option<&Reading> {
        self.reading.as_ref()
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_fetching(&self) -> bool {
        self.status.is_fetching()
    }

    /// `"The temp in {city} is {temp}"`, with an empty temperature until one arrives.
    pub fn render_line(&self) -> String {
        let temp = self.temperature().map(|t| t.to_string()).unwrap_or_default();
        format!("The temp in {} is {}", self.active_city, temp)
    }

    pub fn status_line(&self) -> Option<String> {
        match &self.status {
            FetchStatus::Fetching(_) => Some("fetching...".to_string()),
            FetchStatus::Failed(reason) => Some(format!("lookup failed: {reason}")),
            FetchStatus::Idle | FetchStatus::Success(_) => None,
        }
    }
}
