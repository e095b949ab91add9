//! Transition events delivered by the host's geofencing service.
//!
//! An event says whether the tracked entity entered or left one or more zones.
//! Several zones can be reported at once when more than one boundary was
//! crossed since the previous event. Events are consumed once and not kept.

use crate::errors::TrackerError;
use crate::zone::ZoneId;
use serde::Deserialize;
use std::fmt::{Display, Formatter};

/// Kind of geofence transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Entity moved into the triggering zones
    Enter,
    /// Entity moved out of the triggering zones
    Exit,
    /// Entity lingered inside the triggering zones. Carries no distance change.
    Dwell,
}

impl Display for TransitionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Enter => write!(f, "Enter"),
            TransitionKind::Exit => write!(f, "Exit"),
            TransitionKind::Dwell => write!(f, "Dwell"),
        }
    }
}

/// A single zone membership change.
///
/// JSON form, as read by the `watch` command:
///
/// ```
/// # use ring_tracker::event::{TransitionEvent, TransitionKind};
/// let ev: TransitionEvent = serde_json::from_str(r#"{"kind":"exit","zones":["2","0",1]}"#).unwrap();
/// assert_eq!(ev.kind, TransitionKind::Exit);
/// assert_eq!(ev.triggered_zone_ids.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransitionEvent {
    pub kind: TransitionKind,
    #[serde(rename = "zones", default)]
    pub triggered_zone_ids: Vec<ZoneId>,
}

impl TransitionEvent {
    pub fn new(kind: TransitionKind, triggered_zone_ids: impl IntoIterator<Item = ZoneId>) -> Self {
        Self {
            kind,
            triggered_zone_ids: triggered_zone_ids.into_iter().collect(),
        }
    }

    /// Builds an event from the string request ids the host hands over.
    ///
    /// Fails with [`TrackerError::MalformedZoneId`] on the first id that is not
    /// a non-negative integer.
    pub fn parse<I, S>(kind: TransitionKind, request_ids: I) -> Result<Self, TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = request_ids
            .into_iter()
            .map(|id| id.as_ref().parse::<ZoneId>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(kind, ids))
    }
}
