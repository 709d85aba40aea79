use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to every outbound lookup, strictly increasing per widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn next(self) -> Self {
        RequestId(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Air temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(f64);

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Temperature(celsius)
    }

    pub fn celsius(&self) -> f64 {
        self.0
    }
}

/// Formats like a plain number: `18.5`, `18`, `-3.2`.
impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.0 would otherwise print as "-0"
        if self.0 == 0.0 {
            return f.write_str("0");
        }
        write!(f, "{}", self.0)
    }
}

/// A temperature together with the city it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub city: String,
    pub temperature: Temperature,
    pub fetched_at: DateTime<Utc>,
}

/// Lifecycle of the most recent lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching(RequestId),
    Success(Temperature),
    Failed(String),
}

impl FetchStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, FetchStatus::Fetching(_))
    }

    /// The id of the in-flight request, if any.
    pub fn pending(&self) -> Option<RequestId> {
        match self {
            FetchStatus::Fetching(id) => Some(*id),
            _ => None,
        }
    }
}
