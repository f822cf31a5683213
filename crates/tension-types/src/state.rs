//! Environmental tension state for a single location.

use crate::clock::Timestamp;
use crate::location::LocationKey;
use crate::modifier::TensionModifier;
use serde::{Deserialize, Serialize};

/// Bound on how many recent event ids a [`TensionState`] keeps, matching the
/// trim applied when a tension event is recorded.
pub const RECENT_EVENTS_BOUND: usize = 10;

/// The settled tension value for a region or POI, plus the modifiers
/// currently contributing to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionState {
    pub location: LocationKey,
    pub value: f64,
    pub modifiers: Vec<TensionModifier>,
    pub last_updated: Timestamp,
    pub recent_events: Vec<String>,
}

impl TensionState {
    pub fn new(location: LocationKey, base_value: f64, at: Timestamp) -> Self {
        Self {
            location,
            value: base_value,
            modifiers: Vec::new(),
            last_updated: at,
            recent_events: Vec::new(),
        }
    }

    /// Record an event id, trimming to the last [`RECENT_EVENTS_BOUND`] entries.
    pub fn record_event(&mut self, event_id: impl Into<String>) {
        self.recent_events.push(event_id.into());
        if self.recent_events.len() > RECENT_EVENTS_BOUND {
            let overflow = self.recent_events.len() - RECENT_EVENTS_BOUND;
            self.recent_events.drain(0..overflow);
        }
    }

    /// Drop modifiers that have expired as of `now`, returning how many were removed.
    pub fn sweep_expired_modifiers(&mut self, now: Timestamp) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| !m.is_expired(now));
        before - self.modifiers.len()
    }

    pub fn active_modifier_sum(&self, now: Timestamp) -> f64 {
        self.modifiers
            .iter()
            .filter(|m| m.is_active(now))
            .map(|m| m.value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_events_trims_to_bound() {
        let mut state = TensionState::new(LocationKey::region("r1"), 0.2, Timestamp::from_secs(0));
        for i in 0..15 {
            state.record_event(format!("evt_{i}"));
        }
        assert_eq!(state.recent_events.len(), RECENT_EVENTS_BOUND);
        assert_eq!(state.recent_events.first().unwrap(), "evt_5");
        assert_eq!(state.recent_events.last().unwrap(), "evt_14");
    }

    #[test]
    fn sweep_removes_only_expired() {
        let now = Timestamp::from_secs(0);
        let mut state = TensionState::new(LocationKey::region("r1"), 0.2, now);
        state
            .modifiers
            .push(TensionModifier::new("m1", "t1", "s", 0.1, now, 10.0));
        state
            .modifiers
            .push(TensionModifier::new("m2", "t2", "s", 0.1, now, 1.0));
        let removed = state.sweep_expired_modifiers(now.plus_hours(5.0));
        assert_eq!(removed, 1);
        assert_eq!(state.modifiers.len(), 1);
    }
}
