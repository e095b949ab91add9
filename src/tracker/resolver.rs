//! Ring resolution.
//!
//! Zones are nested rings around the reference point, numbered from the inside
//! out. A transition event can report several rings at once when the entity
//! crossed more than one boundary since the last event:
//!
//! - **Enter**: the entity is now inside the innermost ring it crossed, so the
//!   smallest id is the new ring.
//! - **Exit**: the entity left the outermost ring it crossed and sits in the
//!   band just outside it, so the ring is the largest id plus one. No upper
//!   bound is applied; with sparse zone ids this can name a ring that has no
//!   configured zone.

use crate::errors::TrackerError;
use crate::event::{TransitionEvent, TransitionKind};
use crate::zone::ZoneId;
use std::fmt::{Display, Formatter};

/// Resolved distance band. Wider than [`ZoneId`] so `u32::MAX + 1` is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingIndex(pub u64);

impl RingIndex {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for RingIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stateless resolver from transition events to ring indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingResolver;

impl RingResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, event: &TransitionEvent) -> Result<RingIndex, TrackerError> {
        resolve(event.kind, &event.triggered_zone_ids)
    }

    /// Parses the host's string request ids and resolves them.
    pub fn resolve_raw<I, S>(&self, kind: TransitionKind, request_ids: I) -> Result<RingIndex, TrackerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve(&TransitionEvent::parse(kind, request_ids)?)
    }
}

/// Maps a transition kind and its triggering zones to a ring index.
pub fn resolve(kind: TransitionKind, zones: &[ZoneId]) -> Result<RingIndex, TrackerError> {
    let (min, max) = zones
        .iter()
        .fold(None, |acc: Option<(ZoneId, ZoneId)>, &id| match acc {
            None => Some((id, id)),
            Some((lo, hi)) => Some((lo.min(id), hi.max(id))),
        })
        .ok_or(TrackerError::NoTriggeringZones)?;

    match kind {
        TransitionKind::Enter => Ok(RingIndex(u64::from(min.get()))),
        TransitionKind::Exit => Ok(RingIndex(u64::from(max.get()) + 1)),
        TransitionKind::Dwell => Err(TrackerError::UnsupportedTransition(kind)),
    }
}
