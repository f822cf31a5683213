//! Outbound event bus contract.
//!
//! The engine and coordinator never hold a reference to a concrete message
//! broker; they publish through this trait, matching the teacher's
//! `TickEvents` resource (`sim-core/src/systems/action/execute.rs`) which
//! collects emitted events for the tick and drains them rather than pushing
//! straight onto a transport.

use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic names published to the bus. Centralized here so producers and
/// subscribers never hand-type a string.
pub mod topics {
    pub const TENSION_THRESHOLD_CROSSED: &str = "tension:threshold_crossed";
    pub const WAR_DECLARED: &str = "tension:war_declared";
    pub const ALLIANCE_FORMED: &str = "tension:alliance_formed";
    pub const PEACE_OPPORTUNITY: &str = "tension:peace_opportunity";
    pub const CONFLICT_TRIGGERED: &str = "tension:conflict_triggered";
    pub const REVOLT_OCCURRED: &str = "tension:revolt_occurred";
    pub const COORDINATION_COMPLETE: &str = "tension:coordination_complete";
}

/// The payload carried on a bus publish. A closed set mirroring the
/// outbound event shapes named in the external interface contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BusPayload {
    ThresholdCrossed {
        location: String,
        value: f64,
        threshold: f64,
    },
    WarDeclared {
        faction_a_id: String,
        faction_b_id: String,
        tension: f64,
        at: Timestamp,
    },
    AllianceFormed {
        faction_a_id: String,
        faction_b_id: String,
        tension: f64,
        at: Timestamp,
    },
    PeaceOpportunity {
        faction_a_id: String,
        faction_b_id: String,
        tension: f64,
        at: Timestamp,
    },
    ConflictTriggered {
        trigger_name: String,
        location: String,
        severity: f64,
        at: Timestamp,
    },
    RevoltOccurred {
        location: String,
        casualties_total: u64,
        duration_hours: u64,
        at: Timestamp,
    },
    CoordinationComplete {
        region_id: String,
        event_type: String,
        at: Timestamp,
    },
}

/// Error surfaced by a bus implementation that can fail to deliver
/// (e.g. a remote broker connection drop). The in-memory reference
/// implementation never returns one.
#[derive(Debug, Clone)]
pub struct BusPublishError(pub String);

impl fmt::Display for BusPublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event bus publish failed: {}", self.0)
    }
}

impl std::error::Error for BusPublishError {}

/// Typed publish/subscribe contract. Delivery is at-least-once; subscribers
/// must tolerate duplicate or out-of-order notifications.
pub trait EventBus: Send + Sync {
    fn publish(&self, topic: &str, payload: BusPayload) -> Result<(), BusPublishError>;
}

/// In-memory bus that records every publish for test assertions, mirroring
/// the teacher's `TickEvents { events: Vec<Event>, .. }` collect-then-drain
/// pattern.
#[derive(Debug, Default)]
pub struct RecordingEventBus {
    published: std::sync::Mutex<Vec<(String, BusPayload)>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything published so far.
    pub fn drain(&self) -> Vec<(String, BusPayload)> {
        std::mem::take(&mut self.published.lock().expect("bus mutex poisoned"))
    }

    pub fn len(&self) -> usize {
        self.published.lock().expect("bus mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventBus for RecordingEventBus {
    fn publish(&self, topic: &str, payload: BusPayload) -> Result<(), BusPublishError> {
        self.published
            .lock()
            .expect("bus mutex poisoned")
            .push((topic.to_string(), payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_bus_collects_and_drains() {
        let bus = RecordingEventBus::new();
        bus.publish(
            topics::WAR_DECLARED,
            BusPayload::WarDeclared {
                faction_a_id: "a".to_string(),
                faction_b_id: "b".to_string(),
                tension: 75.0,
                at: Timestamp::from_secs(0),
            },
        )
        .unwrap();
        assert_eq!(bus.len(), 1);
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].0, topics::WAR_DECLARED);
        assert!(bus.is_empty());
    }
}
