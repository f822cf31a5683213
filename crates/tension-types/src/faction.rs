//! Faction-to-faction relationship tension.

use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};

/// Classification derived from the numeric tension value on a
/// [`FactionRelationship`], per the thresholds in
/// `update_faction_tension`/`_determine_relationship_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    War,
    Hostile,
    Neutral,
    Friendly,
    Alliance,
}

impl RelationshipType {
    /// `tension` is expected to already be clamped to `[-100, 100]`.
    pub fn from_tension(tension: f64) -> Self {
        if tension >= 70.0 {
            RelationshipType::War
        } else if tension >= 30.0 {
            RelationshipType::Hostile
        } else if tension >= -30.0 {
            RelationshipType::Neutral
        } else if tension > -60.0 {
            RelationshipType::Friendly
        } else {
            RelationshipType::Alliance
        }
    }
}

/// A single recorded interaction between two factions, kept in a
/// time-windowed recent-events list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionRelationshipEvent {
    pub event_id: String,
    pub delta: f64,
    pub at: Timestamp,
}

/// The undirected tension relationship between two factions. Callers always
/// canonicalize the pair via [`canonical_pair`] before constructing or
/// looking one up, so `(a, b)` and `(b, a)` resolve to the same entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionRelationship {
    pub faction_a_id: String,
    pub faction_b_id: String,
    pub tension: f64,
    pub relationship_type: RelationshipType,
    pub last_updated: Timestamp,
    pub recent_events: Vec<FactionRelationshipEvent>,
}

/// Bound on the recent faction-relationship events kept for the 24-hour
/// window query.
pub const FACTION_RECENT_EVENTS_WINDOW_HOURS: f64 = 24.0;

/// Order two faction ids so the pair is commutative: `(a, b)` and `(b, a)`
/// always produce the same canonical pair.
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl FactionRelationship {
    pub fn new(faction_a_id: &str, faction_b_id: &str, at: Timestamp) -> Self {
        let (a, b) = canonical_pair(faction_a_id, faction_b_id);
        Self {
            faction_a_id: a,
            faction_b_id: b,
            tension: 0.0,
            relationship_type: RelationshipType::Neutral,
            last_updated: at,
            recent_events: Vec::new(),
        }
    }

    pub fn involves(&self, faction_id: &str) -> bool {
        self.faction_a_id == faction_id || self.faction_b_id == faction_id
    }

    pub fn other(&self, faction_id: &str) -> Option<&str> {
        if self.faction_a_id == faction_id {
            Some(&self.faction_b_id)
        } else if self.faction_b_id == faction_id {
            Some(&self.faction_a_id)
        } else {
            None
        }
    }

    /// Record an event and drop entries older than the 24-hour window,
    /// measured from `now`.
    pub fn record_event(&mut self, event_id: impl Into<String>, delta: f64, at: Timestamp, now: Timestamp) {
        self.recent_events.push(FactionRelationshipEvent {
            event_id: event_id.into(),
            delta,
            at,
        });
        self.recent_events
            .retain(|e| e.at.hours_until(now) <= FACTION_RECENT_EVENTS_WINDOW_HOURS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_commutative() {
        assert_eq!(canonical_pair("alpha", "beta"), canonical_pair("beta", "alpha"));
    }

    #[test]
    fn relationship_type_thresholds() {
        assert_eq!(RelationshipType::from_tension(70.0), RelationshipType::War);
        assert_eq!(RelationshipType::from_tension(69.9), RelationshipType::Hostile);
        assert_eq!(RelationshipType::from_tension(30.0), RelationshipType::Hostile);
        assert_eq!(RelationshipType::from_tension(0.0), RelationshipType::Neutral);
        assert_eq!(RelationshipType::from_tension(-30.0), RelationshipType::Neutral);
        assert_eq!(RelationshipType::from_tension(-59.9), RelationshipType::Friendly);
        assert_eq!(RelationshipType::from_tension(-60.0), RelationshipType::Alliance);
    }

    #[test]
    fn new_relationship_canonicalizes_ids() {
        let rel = FactionRelationship::new("zed", "alpha", Timestamp::from_secs(0));
        assert_eq!(rel.faction_a_id, "alpha");
        assert_eq!(rel.faction_b_id, "zed");
    }

    #[test]
    fn other_returns_none_for_uninvolved_faction() {
        let rel = FactionRelationship::new("alpha", "beta", Timestamp::from_secs(0));
        assert_eq!(rel.other("alpha"), Some("beta"));
        assert_eq!(rel.other("gamma"), None);
    }
}
