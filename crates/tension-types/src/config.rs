//! Configuration data model: location tuning, event impact tables, revolt
//! parameters, conflict triggers, and calculation constants.
//!
//! These are plain data — loading, defaulting, and validation live in
//! `tension-engine`'s configuration repository.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-location-type tuning for the environmental tension engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub base_tension: f64,
    pub decay_rate: f64,
    pub max_tension: f64,
    pub min_tension: f64,
    pub player_impact: f64,
    pub npc_impact: f64,
    pub environmental_impact: f64,
}

/// One event type's entry in the impact table: a base impact plus named
/// modifiers consulted by the event impact calculator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventImpactConfig {
    pub base_impact: f64,
    #[serde(default)]
    pub modifiers: HashMap<String, f64>,
}

impl EventImpactConfig {
    pub fn new(base_impact: f64) -> Self {
        Self {
            base_impact,
            modifiers: HashMap::new(),
        }
    }

    pub fn with_modifier(mut self, name: impl Into<String>, value: f64) -> Self {
        self.modifiers.insert(name.into(), value);
        self
    }

    pub fn modifier(&self, name: &str, default: f64) -> f64 {
        *self.modifiers.get(name).unwrap_or(&default)
    }
}

/// Tuning for revolt probability and consequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevoltConfig {
    pub base_probability_threshold: f64,
    pub faction_influence_modifier: f64,
    pub duration_range_hours: (u64, u64),
    pub casualty_multiplier: f64,
    pub economic_impact_factor: f64,
}

/// Requirements that must hold for a named conflict trigger to fire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictRequirements {
    #[serde(default)]
    pub min_factions: Option<u32>,
    #[serde(default)]
    pub power_imbalance: Option<f64>,
    #[serde(default)]
    pub popular_support: Option<f64>,
    #[serde(default)]
    pub alliance_breakdown: Option<bool>,
    /// Any other key is interpreted as a required faction id whose power
    /// score must reach at least the given value.
    #[serde(default)]
    pub named_faction_power: HashMap<String, f64>,
}

/// A named conflict trigger: a tension threshold plus additional
/// requirements, and the severity modifier applied when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictTrigger {
    pub name: String,
    pub threshold: f64,
    pub duration_hours: u64,
    pub requirements: ConflictRequirements,
    pub severity_modifier: f64,
}

/// Global numeric constants used across calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    pub minor: f64,
    pub moderate: f64,
    pub major: f64,
    pub extreme: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevoltProbabilityConstants {
    pub base_threshold: f64,
    pub faction_modifier_per_faction: f64,
    pub tension_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensionLimits {
    pub absolute_min: f64,
    pub absolute_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConstants {
    pub high_tension_threshold: f64,
    pub event_history_hours: f64,
    pub modifier_expiration_check_hours: f64,
    pub severity_thresholds: SeverityThresholds,
    pub revolt_probability: RevoltProbabilityConstants,
    pub tension_limits: TensionLimits,
}

/// The full configuration snapshot consulted by one engine operation. An
/// immutable, cheaply cloneable view swapped in atomically by the
/// configuration repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionConfig {
    pub location_configs: HashMap<String, LocationConfig>,
    pub event_impacts: HashMap<String, EventImpactConfig>,
    pub revolt: RevoltConfig,
    pub conflict_triggers: HashMap<String, ConflictTrigger>,
    pub constants: CalculationConstants,
    pub poi_type_mapping: HashMap<String, String>,
}

impl TensionConfig {
    pub fn location_config_for(&self, location_type: &str) -> &LocationConfig {
        self.location_configs
            .get(location_type)
            .unwrap_or_else(|| &self.location_configs["default"])
    }

    pub fn event_impact_for(&self, event_type: &str) -> &EventImpactConfig {
        self.event_impacts
            .get(event_type)
            .unwrap_or_else(|| &self.event_impacts["default"])
    }

    pub fn location_type_for_poi(&self, poi_type: &str) -> &str {
        self.poi_type_mapping
            .get(poi_type)
            .map(|s| s.as_str())
            .unwrap_or("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_impact_modifier_falls_back_to_default() {
        let cfg = EventImpactConfig::new(0.15).with_modifier("lethal_modifier", 0.3);
        assert_eq!(cfg.modifier("lethal_modifier", 0.0), 0.3);
        assert_eq!(cfg.modifier("missing", 0.5), 0.5);
    }

    #[test]
    fn location_config_falls_back_to_default_entry() {
        let mut configs = HashMap::new();
        configs.insert(
            "default".to_string(),
            LocationConfig {
                base_tension: 0.1,
                decay_rate: 0.05,
                max_tension: 1.0,
                min_tension: 0.0,
                player_impact: 1.0,
                npc_impact: 1.0,
                environmental_impact: 1.0,
            },
        );
        let cfg = TensionConfig {
            location_configs: configs,
            event_impacts: HashMap::new(),
            revolt: RevoltConfig {
                base_probability_threshold: 0.5,
                faction_influence_modifier: 0.1,
                duration_range_hours: (24, 72),
                casualty_multiplier: 1.0,
                economic_impact_factor: 0.3,
            },
            conflict_triggers: HashMap::new(),
            constants: CalculationConstants {
                high_tension_threshold: 0.7,
                event_history_hours: 24.0,
                modifier_expiration_check_hours: 1.0,
                severity_thresholds: SeverityThresholds {
                    minor: 0.1,
                    moderate: 0.3,
                    major: 0.6,
                    extreme: 1.0,
                },
                revolt_probability: RevoltProbabilityConstants {
                    base_threshold: 0.5,
                    faction_modifier_per_faction: 0.1,
                    tension_multiplier: 2.0,
                },
                tension_limits: TensionLimits {
                    absolute_min: 0.0,
                    absolute_max: 1.0,
                },
            },
            poi_type_mapping: HashMap::new(),
        };
        assert_eq!(cfg.location_config_for("unknown_type").base_tension, 0.1);
    }
}
