//! Time-bounded tension modifiers.

use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};

/// A temporary additive adjustment to a [`crate::state::TensionState`]'s
/// base value, applied while `applied_at <= now < expires_at`. At most one
/// modifier per `modifier_type` may be active on a location at a time; a new
/// modifier of the same type replaces the previous one in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionModifier {
    pub id: String,
    pub modifier_type: String,
    pub source: String,
    pub value: f64,
    pub applied_at: Timestamp,
    pub expires_at: Timestamp,
}

impl TensionModifier {
    pub fn new(
        id: impl Into<String>,
        modifier_type: impl Into<String>,
        source: impl Into<String>,
        value: f64,
        applied_at: Timestamp,
        duration_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            modifier_type: modifier_type.into(),
            source: source.into(),
            value,
            applied_at,
            expires_at: applied_at.plus_hours(duration_hours),
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        self.applied_at <= now && now < self.expires_at
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_active_within_window() {
        let applied = Timestamp::from_secs(0);
        let m = TensionModifier::new("m1", "post_revolt_relief", "revolt_relief", -0.3, applied, 72.0);
        assert!(m.is_active(applied));
        assert!(m.is_active(applied.plus_hours(71.0)));
        assert!(!m.is_active(applied.plus_hours(72.0)));
        assert!(m.is_expired(applied.plus_hours(72.0)));
    }
}
