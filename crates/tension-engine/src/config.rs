//! Configuration loading: synthesized defaults plus optional TOML overrides.
//!
//! A missing or malformed section in a loaded file never aborts the whole
//! load — it falls back to that section's default and logs a `warn!`,
//! mirroring the original configuration manager's "never fail, always
//! degrade to defaults" contract.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tension_types::{
    CalculationConstants, ConflictRequirements, ConflictTrigger, EventImpactConfig,
    LocationConfig, RevoltConfig, RevoltProbabilityConstants, SeverityThresholds, TensionConfig,
    TensionLimits,
};

use crate::error::ConfigError;

/// Mirrors `TensionConfig`'s shape but with every section optional, so a
/// TOML file can specify as little as one table and inherit the rest.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialConfigFile {
    location_configs: Option<HashMap<String, LocationConfig>>,
    event_impacts: Option<HashMap<String, EventImpactConfig>>,
    revolt: Option<RevoltConfig>,
    conflict_triggers: Option<HashMap<String, ConflictTrigger>>,
    constants: Option<CalculationConstants>,
    poi_type_mapping: Option<HashMap<String, String>>,
}

/// Loads and synthesizes a [`TensionConfig`]. The default-construction path
/// never fails; file loading degrades to defaults per-section on any parse
/// problem rather than aborting.
#[derive(Debug, Default)]
pub struct ConfigRepository;

impl ConfigRepository {
    pub fn new() -> Self {
        Self
    }

    /// The full set of synthesized defaults, grounded in the original
    /// configuration manager's hardcoded fallback tables.
    pub fn defaults(&self) -> TensionConfig {
        TensionConfig {
            location_configs: default_location_configs(),
            event_impacts: default_event_impacts(),
            revolt: default_revolt_config(),
            conflict_triggers: default_conflict_triggers(),
            constants: default_calculation_constants(),
            poi_type_mapping: default_poi_type_mapping(),
        }
    }

    pub fn from_file(&self, path: &Path) -> Result<TensionConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.from_str(&content))
    }

    /// Parses a TOML document, merging it over the defaults section by
    /// section. A malformed document produces a pure-default config with a
    /// logged warning rather than an error.
    pub fn from_str(&self, content: &str) -> TensionConfig {
        let parsed = match toml::from_str::<PartialConfigFile>(content) {
            Ok(partial) => partial,
            Err(e) => {
                tracing::warn!(error = %e, "malformed tension config, falling back to defaults");
                PartialConfigFile::default()
            }
        };
        self.merge(parsed)
    }

    fn merge(&self, partial: PartialConfigFile) -> TensionConfig {
        let mut defaults = self.defaults();
        if let Some(mut overrides) = partial.location_configs {
            defaults.location_configs.extend(overrides.drain());
        }
        if let Some(mut overrides) = partial.event_impacts {
            defaults.event_impacts.extend(overrides.drain());
        }
        if let Some(revolt) = partial.revolt {
            defaults.revolt = revolt;
        }
        if let Some(mut overrides) = partial.conflict_triggers {
            defaults.conflict_triggers.extend(overrides.drain());
        }
        if let Some(constants) = partial.constants {
            defaults.constants = constants;
        }
        if let Some(mut overrides) = partial.poi_type_mapping {
            defaults.poi_type_mapping.extend(overrides.drain());
        }
        defaults
    }

    pub fn to_toml(&self, config: &TensionConfig) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(config)?)
    }
}

fn loc(
    base_tension: f64,
    decay_rate: f64,
    max_tension: f64,
    min_tension: f64,
    player_impact: f64,
    npc_impact: f64,
    environmental_impact: f64,
) -> LocationConfig {
    LocationConfig {
        base_tension,
        decay_rate,
        max_tension,
        min_tension,
        player_impact,
        npc_impact,
        environmental_impact,
    }
}

pub fn default_location_configs() -> HashMap<String, LocationConfig> {
    let mut m = HashMap::new();
    m.insert("city".to_string(), loc(0.2, 0.05, 1.0, 0.1, 1.5, 1.0, 0.5));
    m.insert("town".to_string(), loc(0.15, 0.06, 1.0, 0.05, 1.2, 1.0, 0.6));
    m.insert("village".to_string(), loc(0.1, 0.08, 1.0, 0.0, 1.0, 1.0, 0.7));
    m.insert("dungeon".to_string(), loc(0.7, 0.02, 1.0, 0.5, 2.0, 1.5, 1.0));
    m.insert("ruins".to_string(), loc(0.5, 0.03, 1.0, 0.3, 1.8, 1.3, 0.9));
    m.insert(
        "wilderness".to_string(),
        loc(0.3, 0.04, 1.0, 0.1, 1.3, 1.1, 0.8),
    );
    m.insert("forest".to_string(), loc(0.25, 0.05, 1.0, 0.05, 1.2, 1.0, 0.8));
    m.insert(
        "mountains".to_string(),
        loc(0.35, 0.03, 1.0, 0.1, 1.4, 1.2, 0.9),
    );
    m.insert("swamp".to_string(), loc(0.4, 0.04, 1.0, 0.15, 1.5, 1.2, 1.0));
    m.insert("coastal".to_string(), loc(0.2, 0.06, 1.0, 0.05, 1.1, 1.0, 0.6));
    m.insert("default".to_string(), loc(0.2, 0.05, 1.0, 0.0, 1.0, 1.0, 0.5));
    m
}

fn impact(base: f64, modifiers: &[(&str, f64)]) -> EventImpactConfig {
    let mut cfg = EventImpactConfig::new(base);
    for (name, value) in modifiers {
        cfg = cfg.with_modifier(*name, *value);
    }
    cfg
}

pub fn default_event_impacts() -> HashMap<String, EventImpactConfig> {
    let mut m = HashMap::new();
    m.insert(
        "player_combat".to_string(),
        impact(0.15, &[("lethal_modifier", 0.3), ("stealth_modifier", -0.1)]),
    );
    m.insert(
        "player_death".to_string(),
        impact(0.25, &[("public_death_modifier", 0.2)]),
    );
    m.insert(
        "npc_death".to_string(),
        impact(
            0.1,
            &[("important_npc_modifier", 0.3), ("civilian_modifier", 0.2)],
        ),
    );
    m.insert(
        "npc_arrival".to_string(),
        impact(
            -0.05,
            &[("authority_modifier", -0.1), ("hostile_modifier", 0.15)],
        ),
    );
    m.insert(
        "environmental_disaster".to_string(),
        impact(0.3, &[("severity_multiplier", 2.0)]),
    );
    m.insert(
        "magical_event".to_string(),
        impact(
            0.2,
            &[("beneficial_modifier", -0.3), ("harmful_modifier", 0.4)],
        ),
    );
    m.insert(
        "economic_change".to_string(),
        impact(
            0.1,
            &[("prosperity_modifier", -0.2), ("recession_modifier", 0.3)],
        ),
    );
    m.insert(
        "political_change".to_string(),
        impact(
            0.2,
            &[
                ("regime_change_modifier", 0.5),
                ("peaceful_transition_modifier", -0.1),
            ],
        ),
    );
    m.insert("festival".to_string(), impact(0.1, &[]));
    m.insert(
        "economic_crisis".to_string(),
        impact(0.1, &[("severity_multiplier", 2.0)]),
    );
    m.insert(
        "market_crash".to_string(),
        impact(0.1, &[("severity_multiplier", 2.0)]),
    );
    m.insert("default".to_string(), impact(0.0, &[]));
    m
}

pub fn default_revolt_config() -> RevoltConfig {
    RevoltConfig {
        base_probability_threshold: 0.5,
        faction_influence_modifier: 0.1,
        duration_range_hours: (24, 72),
        casualty_multiplier: 1.0,
        economic_impact_factor: 0.3,
    }
}

pub fn default_conflict_triggers() -> HashMap<String, ConflictTrigger> {
    let mut m = HashMap::new();
    m.insert(
        "faction_revolt".to_string(),
        ConflictTrigger {
            name: "faction_revolt".to_string(),
            threshold: 0.8,
            duration_hours: 48,
            requirements: ConflictRequirements {
                min_factions: Some(2),
                power_imbalance: Some(0.3),
                popular_support: None,
                alliance_breakdown: None,
                named_faction_power: HashMap::new(),
            },
            severity_modifier: 1.0,
        },
    );
    m.insert(
        "regional_uprising".to_string(),
        ConflictTrigger {
            name: "regional_uprising".to_string(),
            threshold: 0.9,
            duration_hours: 72,
            requirements: ConflictRequirements {
                min_factions: Some(1),
                power_imbalance: None,
                popular_support: Some(0.6),
                alliance_breakdown: None,
                named_faction_power: HashMap::new(),
            },
            severity_modifier: 0.7,
        },
    );
    m.insert(
        "inter_faction_war".to_string(),
        ConflictTrigger {
            name: "inter_faction_war".to_string(),
            threshold: 0.7,
            duration_hours: 168,
            requirements: ConflictRequirements {
                min_factions: Some(3),
                power_imbalance: None,
                popular_support: None,
                alliance_breakdown: Some(true),
                named_faction_power: HashMap::new(),
            },
            severity_modifier: 0.5,
        },
    );
    m
}

pub fn default_calculation_constants() -> CalculationConstants {
    CalculationConstants {
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
    }
}

pub fn default_poi_type_mapping() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("CITY".to_string(), "city".to_string());
    m.insert("TOWN".to_string(), "town".to_string());
    m.insert("VILLAGE".to_string(), "village".to_string());
    m.insert("DUNGEON".to_string(), "dungeon".to_string());
    m.insert("RUINS".to_string(), "ruins".to_string());
    m.insert("CAMP".to_string(), "wilderness".to_string());
    m.insert("TOWER".to_string(), "ruins".to_string());
    m.insert("TEMPLE".to_string(), "city".to_string());
    m.insert("MINE".to_string(), "wilderness".to_string());
    m.insert("FORTRESS".to_string(), "city".to_string());
    m.insert("default".to_string(), "default".to_string());
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_contain_all_location_types() {
        let repo = ConfigRepository::new();
        let config = repo.defaults();
        for key in [
            "city", "town", "village", "dungeon", "ruins", "wilderness", "forest", "mountains",
            "swamp", "coastal", "default",
        ] {
            assert!(config.location_configs.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn partial_file_inherits_untouched_sections() {
        let repo = ConfigRepository::new();
        let toml = r#"
            [revolt]
            base_probability_threshold = 0.9
            faction_influence_modifier = 0.1
            duration_range_hours = [12, 48]
            casualty_multiplier = 2.0
            economic_impact_factor = 0.5
        "#;
        let config = repo.from_str(toml);
        assert_eq!(config.revolt.base_probability_threshold, 0.9);
        assert_eq!(
            config.location_configs.len(),
            default_location_configs().len()
        );
    }

    #[test]
    fn malformed_file_falls_back_to_pure_defaults() {
        let repo = ConfigRepository::new();
        let config = repo.from_str("not valid = [ toml");
        assert_eq!(
            config.location_configs.len(),
            default_location_configs().len()
        );
        assert_eq!(config.revolt.base_probability_threshold, 0.5);
    }

    #[test]
    fn round_trips_through_toml() {
        let repo = ConfigRepository::new();
        let defaults = repo.defaults();
        let toml = repo.to_toml(&defaults).expect("serialize");
        let reloaded = repo.from_str(&toml);
        assert_eq!(
            reloaded.revolt.base_probability_threshold,
            defaults.revolt.base_probability_threshold
        );
    }

    #[test]
    fn from_file_loads_and_merges_an_actual_file_on_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("create temp config file");
        write!(
            file,
            "[revolt]\nbase_probability_threshold = 0.9\nfaction_influence_modifier = 0.1\nduration_range_hours = [12, 48]\ncasualty_multiplier = 2.0\neconomic_impact_factor = 0.5\n"
        )
        .expect("write temp config file");

        let repo = ConfigRepository::new();
        let config = repo.from_file(file.path()).expect("load config from file");
        assert_eq!(config.revolt.base_probability_threshold, 0.9);
        assert_eq!(
            config.location_configs.len(),
            default_location_configs().len()
        );
    }

    #[test]
    fn from_file_surfaces_an_error_for_a_missing_path() {
        let repo = ConfigRepository::new();
        let result = repo.from_file(std::path::Path::new("/nonexistent/tension_config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn poi_mapping_covers_known_types() {
        let repo = ConfigRepository::new();
        let config = repo.defaults();
        assert_eq!(config.location_type_for_poi("DUNGEON"), "dungeon");
        assert_eq!(config.location_type_for_poi("UNKNOWN_TYPE"), "default");
    }
}
