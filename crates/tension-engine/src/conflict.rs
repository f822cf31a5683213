//! Conflict trigger evaluation and revolt simulation.

use std::sync::Arc;

use rand::RngCore;
use tension_types::{
    BusPayload, Clock, ConflictTrigger, EventBus, FactionSnapshot, LocationKey, TensionConfig,
    Timestamp, topics,
};

use crate::environmental::EnvironmentalTensionEngine;
use crate::power::calculate_faction_power_score;
use crate::stats::SharedStats;

/// Named post-revolt tension modifier: applied for 72 hours after a revolt
/// concludes, dampening further escalation while the region recovers.
const POST_REVOLT_RELIEF_VALUE: f64 = -0.3;
const POST_REVOLT_RELIEF_DURATION_HOURS: f64 = 72.0;

#[derive(Debug, Clone)]
pub struct RevoltCasualties {
    pub civilian: u64,
    pub faction_members: u64,
    pub authorities: u64,
}

impl RevoltCasualties {
    pub fn total(&self) -> u64 {
        self.civilian + self.faction_members + self.authorities
    }
}

#[derive(Debug, Clone)]
pub struct RevoltOutcome {
    pub duration_hours: u64,
    pub casualties: RevoltCasualties,
}

pub struct ConflictEvaluator {
    clock: Arc<dyn Clock>,
    bus: Option<Arc<dyn EventBus>>,
    stats: SharedStats,
}

impl ConflictEvaluator {
    pub fn new(clock: Arc<dyn Clock>, stats: SharedStats) -> Self {
        Self {
            clock,
            bus: None,
            stats,
        }
    }

    pub fn with_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    fn evaluate_trigger(
        trigger: &ConflictTrigger,
        tension_value: f64,
        factions: &[FactionSnapshot],
        popular_support: Option<f64>,
        alliance_breakdown: bool,
    ) -> bool {
        if tension_value < trigger.threshold {
            return false;
        }
        let req = &trigger.requirements;
        if let Some(min_factions) = req.min_factions {
            if (factions.len() as u32) < min_factions {
                return false;
            }
        }
        if let Some(required_imbalance) = req.power_imbalance {
            if factions.len() < 2 {
                return false;
            }
            let powers: Vec<f64> = factions
                .iter()
                .map(|f| calculate_faction_power_score(&f.hidden_attributes))
                .collect();
            let max = powers.iter().cloned().fold(f64::MIN, f64::max);
            let min = powers.iter().cloned().fold(f64::MAX, f64::min);
            if (max - min) / 10.0 < required_imbalance {
                return false;
            }
        }
        if let Some(required_support) = req.popular_support {
            match popular_support {
                Some(support) if support >= required_support => {}
                _ => return false,
            }
        }
        if req.alliance_breakdown == Some(true) && !alliance_breakdown {
            return false;
        }
        for (faction_id, required_power) in &req.named_faction_power {
            let power = factions
                .iter()
                .find(|f| &f.id == faction_id)
                .map(|f| calculate_faction_power_score(&f.hidden_attributes));
            match power {
                Some(power) if power >= *required_power => {}
                _ => return false,
            }
        }
        true
    }

    /// Evaluates every configured conflict trigger against the current
    /// tension and faction context, publishing one `ConflictTriggered`
    /// event per trigger that fires. A faction-service lookup failure for
    /// any named faction should be treated upstream as "not evaluable" —
    /// this function only sees the snapshots that were successfully
    /// resolved.
    pub fn check_conflict_triggers(
        &self,
        location: &LocationKey,
        tension_value: f64,
        factions: &[FactionSnapshot],
        popular_support: Option<f64>,
        alliance_breakdown: bool,
        config: &TensionConfig,
    ) -> Vec<ConflictTrigger> {
        let now = self.clock.now();
        let mut fired = Vec::new();
        for trigger in config.conflict_triggers.values() {
            if Self::evaluate_trigger(trigger, tension_value, factions, popular_support, alliance_breakdown) {
                self.stats.increment_conflicts_triggered();
                if let Some(bus) = &self.bus {
                    let _ = bus.publish(
                        topics::CONFLICT_TRIGGERED,
                        BusPayload::ConflictTriggered {
                            trigger_name: trigger.name.clone(),
                            location: location.to_string(),
                            severity: trigger.severity_modifier,
                            at: now,
                        },
                    );
                }
                fired.push(trigger.clone());
            }
        }
        fired
    }

    fn calculate_revolt_probability(tension_value: f64, faction_count: usize, config: &TensionConfig) -> f64 {
        let revolt = &config.revolt;
        (tension_value * revolt.base_probability_threshold
            + faction_count as f64 * revolt.faction_influence_modifier)
            .min(1.0)
    }

    fn calculate_revolt_casualties(tension_value: f64, faction_count: usize, config: &TensionConfig) -> RevoltCasualties {
        let base = (tension_value * 10.0 * faction_count as f64) as i64;
        let multiplied = (base as f64 * config.revolt.casualty_multiplier) as i64;
        RevoltCasualties {
            civilian: (multiplied / 2).max(1) as u64,
            faction_members: (multiplied / 4).max(0) as u64,
            authorities: (multiplied / 8).max(0) as u64,
        }
    }

    /// Rolls for a revolt given the current tension and faction count. On
    /// success, rolls an inclusive-uniform duration and computes
    /// casualties, applies a cooling-off tension modifier via `env_engine`,
    /// and publishes `RevoltOccurred`. `rng` is injected so tests can make
    /// this deterministic.
    pub fn simulate_revolt(
        &self,
        location: &LocationKey,
        location_type: &str,
        tension_value: f64,
        faction_count: usize,
        rng: &mut dyn RngCore,
        env_engine: &EnvironmentalTensionEngine,
        config: &TensionConfig,
    ) -> Option<RevoltOutcome> {
        use rand::Rng;

        let probability = Self::calculate_revolt_probability(tension_value, faction_count, config);
        let roll: f64 = rng.gen();
        if roll >= probability {
            return None;
        }

        let (min_hours, max_hours) = config.revolt.duration_range_hours;
        let duration_hours = rng.gen_range(min_hours..=max_hours);
        let casualties = Self::calculate_revolt_casualties(tension_value, faction_count, config);

        env_engine.add_tension_modifier(
            location,
            location_type,
            "post_revolt_relief",
            "post_revolt_relief",
            POST_REVOLT_RELIEF_VALUE,
            POST_REVOLT_RELIEF_DURATION_HOURS,
            config,
        );

        self.stats.increment_revolts_triggered();
        if let Some(bus) = &self.bus {
            let _ = bus.publish(
                topics::REVOLT_OCCURRED,
                BusPayload::RevoltOccurred {
                    location: location.to_string(),
                    casualties_total: casualties.total(),
                    duration_hours,
                    at: self.clock.now(),
                },
            );
        }

        Some(RevoltOutcome {
            duration_hours,
            casualties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigRepository;
    use crate::repository::InMemoryTensionStateRepository;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use tension_types::{FixedClock, HiddenAttributes};

    fn factions(n: usize) -> Vec<FactionSnapshot> {
        (0..n)
            .map(|i| FactionSnapshot {
                id: format!("f{i}"),
                power_level: 1.0,
                member_count: 10,
                hidden_attributes: HiddenAttributes::default(),
            })
            .collect()
    }

    #[test]
    fn trigger_requires_minimum_tension_and_faction_count() {
        let config = ConfigRepository::new().defaults();
        let clock = Arc::new(FixedClock::new(Timestamp::from_secs(0)));
        let evaluator = ConflictEvaluator::new(clock, SharedStats::new());
        let location = LocationKey::region("r1");

        let below_threshold = evaluator.check_conflict_triggers(&location, 0.1, &factions(3), None, false, &config);
        assert!(below_threshold.is_empty());

        let not_enough_factions =
            evaluator.check_conflict_triggers(&location, 0.95, &factions(0), None, false, &config);
        assert!(!not_enough_factions.iter().any(|t| t.name == "faction_revolt"));
    }

    #[test]
    fn regional_uprising_requires_popular_support() {
        let config = ConfigRepository::new().defaults();
        let clock = Arc::new(FixedClock::new(Timestamp::from_secs(0)));
        let evaluator = ConflictEvaluator::new(clock, SharedStats::new());
        let location = LocationKey::region("r1");

        let without_support = evaluator.check_conflict_triggers(&location, 0.95, &factions(1), None, false, &config);
        assert!(!without_support.iter().any(|t| t.name == "regional_uprising"));

        let with_support =
            evaluator.check_conflict_triggers(&location, 0.95, &factions(1), Some(0.7), false, &config);
        assert!(with_support.iter().any(|t| t.name == "regional_uprising"));
    }

    #[test]
    fn revolt_rolls_deterministically_with_seeded_rng() {
        let config = ConfigRepository::new().defaults();
        let clock = Arc::new(FixedClock::new(Timestamp::from_secs(0)));
        let repo = Arc::new(InMemoryTensionStateRepository::new());
        let env_engine = EnvironmentalTensionEngine::new(repo, clock.clone(), SharedStats::new());
        let evaluator = ConflictEvaluator::new(clock, SharedStats::new());
        let location = LocationKey::region("r1");

        let mut rng = SmallRng::seed_from_u64(1);
        let outcome = evaluator.simulate_revolt(&location, "city", 0.9, 3, &mut rng, &env_engine, &config);
        assert!(outcome.is_some());
        let outcome = outcome.unwrap();
        assert!(outcome.duration_hours >= 24 && outcome.duration_hours <= 72);
        assert!(outcome.casualties.civilian >= 1);
    }

    #[test]
    fn named_faction_power_requirement_checks_that_specific_faction() {
        use std::collections::HashMap;
        use tension_types::ConflictRequirements;

        let trigger = ConflictTrigger {
            name: "crows_uprising".to_string(),
            threshold: 0.5,
            duration_hours: 24,
            requirements: ConflictRequirements {
                named_faction_power: HashMap::from([("crows".to_string(), 5.0)]),
                ..Default::default()
            },
            severity_modifier: 1.0,
        };

        let weak_crows = vec![FactionSnapshot {
            id: "crows".to_string(),
            power_level: 1.0,
            member_count: 1,
            hidden_attributes: HiddenAttributes::default(),
        }];
        assert!(!ConflictEvaluator::evaluate_trigger(&trigger, 0.9, &weak_crows, None, false));

        let strong_attrs = HiddenAttributes {
            ambition: 10.0,
            discipline: 10.0,
            pragmatism: 10.0,
            resilience: 10.0,
            integrity: 10.0,
            impulsivity: 0.0,
        };
        let strong_crows = vec![FactionSnapshot {
            id: "crows".to_string(),
            power_level: 1.0,
            member_count: 500,
            hidden_attributes: strong_attrs.clone(),
        }];
        assert!(ConflictEvaluator::evaluate_trigger(&trigger, 0.9, &strong_crows, None, false));

        let no_crows = vec![FactionSnapshot {
            id: "ravens".to_string(),
            power_level: 1.0,
            member_count: 500,
            hidden_attributes: strong_attrs,
        }];
        assert!(!ConflictEvaluator::evaluate_trigger(&trigger, 0.9, &no_crows, None, false));
    }

    #[test]
    fn revolt_casualty_formula_uses_floor_division() {
        let config = ConfigRepository::new().defaults();
        let casualties = ConflictEvaluator::calculate_revolt_casualties(0.9, 3, &config);
        // base = floor(0.9*10*3) = 27, multiplied = floor(27*1.0) = 27
        assert_eq!(casualties.civilian, 13);
        assert_eq!(casualties.faction_members, 6);
        assert_eq!(casualties.authorities, 3);
    }
}
