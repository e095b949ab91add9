//! Zone identifiers.
//!
//! A zone is a circular monitoring region registered with the host's
//! geofencing service. The tracker never sees the geometry: it only receives
//! the zone's request id, which encodes its distance ordering. Zone `0` is the
//! innermost ring around the reference point, zone `1` the next one out, and so
//! on.

use crate::errors::TrackerError;
use serde::{Deserialize, Deserializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Distance-ordered zone identifier. Lower ids are closer to the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneId(pub u32);

impl ZoneId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ZoneId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ZoneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ZoneId {
    type Err = TrackerError;

    /// Parses a geofence request id: plain decimal digits with an optional leading `+`.
    /// Whitespace and negative values are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(ZoneId)
            .map_err(|_| TrackerError::MalformedZoneId(s.to_string()))
    }
}

// Hosts hand over request ids as strings, hand-written events often use plain numbers.
impl<'de> Deserialize<'de> for ZoneId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(ZoneId(n)),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
