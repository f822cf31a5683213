//! Faction-to-faction relationship tension engine.

use std::sync::Arc;

use tension_types::{
    BusPayload, Clock, EventBus, FactionRelationship, RelationshipType, Timestamp, topics,
};

use crate::repository::FactionRelationshipRepository;
use crate::stats::SharedStats;

/// Points of relationship tension decayed per full day elapsed, before the
/// floor-1 halving applied on the alliance side.
pub const FACTION_TENSION_DECAY_PER_DAY: f64 = 2.0;

/// A relationship's tension is only reclassified during a *bulk* decay pass
/// if decay moved it by at least this much — avoids thrashing the
/// relationship type back and forth on sub-threshold drift. Event-driven
/// updates via `update_faction_tension` always reclassify immediately.
pub const DECAY_RECLASSIFY_THRESHOLD: f64 = 5.0;

pub struct FactionRelationshipEngine {
    repo: Arc<dyn FactionRelationshipRepository>,
    clock: Arc<dyn Clock>,
    bus: Option<Arc<dyn EventBus>>,
    stats: SharedStats,
}

impl FactionRelationshipEngine {
    pub fn new(repo: Arc<dyn FactionRelationshipRepository>, clock: Arc<dyn Clock>, stats: SharedStats) -> Self {
        Self {
            repo,
            clock,
            bus: None,
            stats,
        }
    }

    pub fn with_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn get_faction_relationship(&self, faction_a_id: &str, faction_b_id: &str) -> Option<FactionRelationship> {
        self.repo.get(faction_a_id, faction_b_id)
    }

    pub fn get_faction_relationships_for_faction(&self, faction_id: &str) -> Vec<FactionRelationship> {
        self.repo.for_faction(faction_id)
    }

    pub fn get_faction_wars(&self, faction_id: &str) -> Vec<FactionRelationship> {
        self.repo
            .for_faction(faction_id)
            .into_iter()
            .filter(|r| r.relationship_type == RelationshipType::War)
            .collect()
    }

    pub fn get_faction_alliances(&self, faction_id: &str) -> Vec<FactionRelationship> {
        self.repo
            .for_faction(faction_id)
            .into_iter()
            .filter(|r| r.relationship_type == RelationshipType::Alliance)
            .collect()
    }

    pub fn check_war_status(&self, faction_a_id: &str, faction_b_id: &str) -> bool {
        self.repo
            .get(faction_a_id, faction_b_id)
            .map(|r| r.relationship_type == RelationshipType::War)
            .unwrap_or(false)
    }

    /// Whole-days-elapsed decay: no-op below one full day; positive tension
    /// decays toward zero, negative (alliance) tension decays at half rate
    /// with a floor of 1 point/day.
    fn decay(relationship: &mut FactionRelationship, now: Timestamp) -> f64 {
        let days_passed = relationship.last_updated.days_until(now);
        if days_passed < 1.0 {
            return 0.0;
        }
        let daily_decay = (days_passed * FACTION_TENSION_DECAY_PER_DAY) as i64;
        let before = relationship.tension;
        if relationship.tension > 0.0 {
            relationship.tension = (relationship.tension - daily_decay as f64).max(0.0);
        } else if relationship.tension < 0.0 {
            let alliance_decay = (daily_decay / 2).max(1) as f64;
            relationship.tension = (relationship.tension + alliance_decay).min(0.0);
        }
        relationship.last_updated = now;
        relationship.tension - before
    }

    fn check_relationship_triggers(&self, faction_a_id: &str, faction_b_id: &str, old_tension: f64, new_tension: f64, at: Timestamp) {
        let payload = if old_tension < 70.0 && new_tension >= 70.0 {
            self.stats.increment_wars_triggered();
            Some((
                topics::WAR_DECLARED,
                BusPayload::WarDeclared {
                    faction_a_id: faction_a_id.to_string(),
                    faction_b_id: faction_b_id.to_string(),
                    tension: new_tension,
                    at,
                },
            ))
        } else if old_tension > -50.0 && new_tension <= -50.0 {
            self.stats.increment_alliances_formed();
            Some((
                topics::ALLIANCE_FORMED,
                BusPayload::AllianceFormed {
                    faction_a_id: faction_a_id.to_string(),
                    faction_b_id: faction_b_id.to_string(),
                    tension: new_tension,
                    at,
                },
            ))
        } else if old_tension >= 70.0 && new_tension < 70.0 {
            Some((
                topics::PEACE_OPPORTUNITY,
                BusPayload::PeaceOpportunity {
                    faction_a_id: faction_a_id.to_string(),
                    faction_b_id: faction_b_id.to_string(),
                    tension: new_tension,
                    at,
                },
            ))
        } else {
            None
        };

        if let (Some(bus), Some((topic, payload))) = (&self.bus, payload) {
            let _ = bus.publish(topic, payload);
        }
    }

    /// Decays the relationship to `now`, applies `delta`, clamps to
    /// `[-100, 100]`, reclassifies, records the event, persists, and
    /// publishes any threshold-crossing event.
    pub fn update_faction_tension(
        &self,
        faction_a_id: &str,
        faction_b_id: &str,
        delta: f64,
        event_id: impl Into<String>,
        at: Timestamp,
    ) -> f64 {
        let now = self.clock.now();
        let mut relationship = self
            .repo
            .get(faction_a_id, faction_b_id)
            .unwrap_or_else(|| FactionRelationship::new(faction_a_id, faction_b_id, now));

        Self::decay(&mut relationship, now);
        let old_tension = relationship.tension;
        let new_tension = (old_tension + delta).clamp(-100.0, 100.0);
        relationship.tension = new_tension;
        relationship.relationship_type = RelationshipType::from_tension(new_tension);
        relationship.record_event(event_id, delta, at, now);
        relationship.last_updated = now;

        self.repo.save(relationship);
        self.stats.increment_faction_updates();
        self.check_relationship_triggers(faction_a_id, faction_b_id, old_tension, new_tension, now);
        new_tension
    }

    /// Applies the whole-days decay to every tracked relationship, only
    /// reclassifying those that moved by at least [`DECAY_RECLASSIFY_THRESHOLD`].
    pub fn decay_all_faction_tension(&self) {
        let now = self.clock.now();
        for mut relationship in self.repo.all() {
            let delta = Self::decay(&mut relationship, now);
            if delta.abs() >= DECAY_RECLASSIFY_THRESHOLD {
                relationship.relationship_type = RelationshipType::from_tension(relationship.tension);
            }
            self.repo.save(relationship);
        }
        self.stats.record_global_update(now);
    }
}
