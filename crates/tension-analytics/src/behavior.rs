//! Player behavior profiling, derived from a player's tension-impact
//! history and region activity.

use std::collections::HashMap;

use tension_types::{PlayerBehaviorProfile, Timestamp};

use crate::mathutil::mean;

pub struct BehaviorAnalyzer;

impl BehaviorAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Builds a profile from the impacts a player's events have had on
    /// tension, and how often they visit each region. `risk_assessment` is
    /// the mean absolute impact, clamped to `[0, 1]` — a player who
    /// consistently raises tension sharply scores close to 1.
    pub fn analyze_player_behavior(
        &self,
        player_id: &str,
        tension_impact_history: &[f64],
        region_visits: &HashMap<String, u32>,
        now: Timestamp,
    ) -> PlayerBehaviorProfile {
        let abs_impacts: Vec<f64> = tension_impact_history.iter().map(|v| v.abs()).collect();
        let risk_assessment = mean(&abs_impacts).min(1.0);

        let mut preferred_regions: Vec<(String, u32)> =
            region_visits.iter().map(|(k, v)| (k.clone(), *v)).collect();
        preferred_regions.sort_by(|a, b| b.1.cmp(&a.1));
        let preferred_regions: Vec<String> = preferred_regions
            .into_iter()
            .take(3)
            .map(|(region, _)| region)
            .collect();

        let mut behavior_patterns = HashMap::new();
        behavior_patterns.insert("mean_impact".to_string(), mean(tension_impact_history));
        behavior_patterns.insert("event_count".to_string(), tension_impact_history.len() as f64);

        let mut activity_patterns = HashMap::new();
        for (region, visits) in region_visits {
            activity_patterns.insert(region.clone(), *visits as f64);
        }

        PlayerBehaviorProfile {
            player_id: player_id.to_string(),
            behavior_patterns,
            tension_impact_history: tension_impact_history.to_vec(),
            preferred_regions,
            activity_patterns,
            risk_assessment,
            last_updated: Some(now),
        }
    }
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_impact_events_produce_high_risk_assessment() {
        let analyzer = BehaviorAnalyzer::new();
        let visits = HashMap::from([("north_vale".to_string(), 10), ("old_mill".to_string(), 2)]);
        let profile = analyzer.analyze_player_behavior("p1", &[0.8, 0.9, 0.95], &visits, Timestamp::from_secs(0));
        assert!(profile.risk_assessment > 0.8);
        assert_eq!(profile.preferred_regions[0], "north_vale");
    }
}
