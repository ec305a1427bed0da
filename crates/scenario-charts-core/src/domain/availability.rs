//! The "unavailable" sentinel.

use serde::{Deserialize, Serialize};

/// A value that may be unavailable because its raw data is missing,
/// error-flagged, or still being fetched.
///
/// Unavailability is an expected condition, distinct from an error: callers
/// render a "no data" state rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn as_ref(&self) -> Availability<&T> {
        match self {
            Availability::Available(v) => Availability::Available(v),
            Availability::Unavailable => Availability::Unavailable,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Availability<U> {
        match self {
            Availability::Available(v) => Availability::Available(f(v)),
            Availability::Unavailable => Availability::Unavailable,
        }
    }

    /// Convert into an `Option`, dropping the sentinel.
    pub fn available(self) -> Option<T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Availability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Availability::Available(v),
            None => Availability::Unavailable,
        }
    }
}
