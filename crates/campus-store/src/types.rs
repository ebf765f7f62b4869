//! Domain value types validated at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Kind of campus event. Closed set; stored as its display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Hands-on workshop.
    Workshop,
    /// Hackathon.
    Hackathon,
    /// Cultural or technical fest.
    Fest,
    /// Talk or seminar.
    Seminar,
}

impl EventType {
    /// All variants, in declaration order.
    pub const ALL: [Self; 4] = [Self::Workshop, Self::Hackathon, Self::Fest, Self::Seminar];

    /// Accepted spellings, for error messages.
    pub const EXPECTED: &'static str = "Workshop, Hackathon, Fest, Seminar";

    /// Stored and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workshop => "Workshop",
            Self::Hackathon => "Hackathon",
            Self::Fest => "Fest",
            Self::Seminar => "Seminar",
        }
    }

    /// Parse a caller-supplied value, mapping failure to
    /// [`StoreError::InvalidEnum`].
    pub fn parse_field(value: &str) -> Result<Self, StoreError> {
        value.parse().map_err(|_| StoreError::InvalidEnum {
            field: "type",
            value: value.to_string(),
            expected: Self::EXPECTED,
        })
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not an [`EventType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct ParseEventTypeError(pub String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEventTypeError(s.to_string()))
    }
}

/// Feedback rating, guaranteed to lie in `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: i64 = 1;
    /// Highest accepted rating.
    pub const MAX: i64 = 5;

    /// Validate a raw rating.
    pub fn new(value: i64) -> Result<Self, StoreError> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&i64::from(v)) => Ok(Self(v)),
            _ => Err(StoreError::InvalidRange {
                field: "rating",
                value,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }

    /// The rating as an integer.
    pub fn get(self) -> u8 {
        self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
