//! Integration coordinator: ties the stateful engine to the read-only
//! analytics views and exposes the handful of cross-cutting queries that
//! need both — comprehensive analysis, coordinated responses, and system
//! health.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tension_engine::{ConflictEvaluator, EnvironmentalTensionEngine, FactionRelationshipEngine, SharedStats};
use tension_types::{
    AnomalyDetection, Clock, FactionRelationship, LocationKey, PatternDetection, SampleHistory,
    SystemHealth, TensionConfig, TensionPrediction, Timestamp,
};

use crate::anomaly::AnomalyDetector;
use crate::pattern::PatternAnalyzer;
use crate::prediction::{PredictionSignals, TensionPredictionEngine};

/// One call's worth of read-only analysis for a location: what the engine
/// currently reports plus every derived view the analytics layer can build
/// from its sample history.
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveAnalysis {
    pub location: LocationKey,
    pub current_tension: f64,
    pub patterns: Vec<PatternDetection>,
    pub anomalies: Vec<AnomalyDetection>,
    pub prediction: TensionPrediction,
    pub faction_relationships: Vec<FactionRelationship>,
}

/// The outcome of triggering a coordinated response to a named conflict
/// trigger: what the environmental engine and relationship engine each did
/// as a result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoordinatedResponse {
    pub trigger_name: String,
    pub actions_taken: Vec<String>,
}

pub struct IntegrationCoordinator {
    env_engine: Arc<EnvironmentalTensionEngine>,
    relationship_engine: Arc<FactionRelationshipEngine>,
    conflict_evaluator: Arc<ConflictEvaluator>,
    pattern_analyzer: PatternAnalyzer,
    anomaly_detector: AnomalyDetector,
    prediction_engine: TensionPredictionEngine,
    clock: Arc<dyn Clock>,
    stats: SharedStats,
    faction_service_connected: bool,
    event_bus_connected: bool,
}

impl IntegrationCoordinator {
    pub fn new(
        env_engine: Arc<EnvironmentalTensionEngine>,
        relationship_engine: Arc<FactionRelationshipEngine>,
        conflict_evaluator: Arc<ConflictEvaluator>,
        clock: Arc<dyn Clock>,
        stats: SharedStats,
    ) -> Self {
        Self {
            env_engine,
            relationship_engine,
            conflict_evaluator,
            pattern_analyzer: PatternAnalyzer::with_defaults(),
            anomaly_detector: AnomalyDetector::with_defaults(),
            prediction_engine: TensionPredictionEngine::with_defaults(),
            clock,
            stats,
            faction_service_connected: false,
            event_bus_connected: false,
        }
    }

    pub fn with_faction_service_connected(mut self, connected: bool) -> Self {
        self.faction_service_connected = connected;
        self
    }

    pub fn with_event_bus_connected(mut self, connected: bool) -> Self {
        self.event_bus_connected = connected;
        self
    }

    /// Settles current tension via the engine, then layers pattern
    /// detection, anomaly detection, and a 24h prediction over the
    /// supplied sample history, plus every faction relationship touching
    /// the factions named in `faction_ids`.
    pub fn get_comprehensive_analysis(
        &self,
        location: &LocationKey,
        location_type: &str,
        history: &SampleHistory,
        faction_ids: &[String],
        config: &TensionConfig,
    ) -> ComprehensiveAnalysis {
        let now = self.clock.now();
        let current_tension = self.env_engine.calculate_tension(location, location_type, config);

        let patterns = self.pattern_analyzer.analyze_tension_patterns(location, history, now);
        let anomalies = self.anomaly_detector.detect_anomalies(location, history, now);
        let prediction = self.prediction_engine.predict_tension_escalation(
            &location.region_id,
            location.poi_id.clone(),
            history,
            PredictionSignals::default(),
            24,
            now,
        );

        let mut seen = std::collections::HashSet::new();
        let mut faction_relationships = Vec::new();
        for faction_id in faction_ids {
            for relationship in self.relationship_engine.get_faction_relationships_for_faction(faction_id) {
                let key = (relationship.faction_a_id.clone(), relationship.faction_b_id.clone());
                if seen.insert(key) {
                    faction_relationships.push(relationship);
                }
            }
        }

        ComprehensiveAnalysis {
            location: location.clone(),
            current_tension,
            patterns,
            anomalies,
            prediction,
            faction_relationships,
        }
    }

    /// Checks conflict triggers for the location and, for each one that
    /// fires, rolls a revolt attempt and records what happened. This is the
    /// single entry point a game loop calls once tension and faction state
    /// for a location have been updated.
    pub fn trigger_coordinated_response(
        &self,
        location: &LocationKey,
        location_type: &str,
        tension_value: f64,
        factions: &[tension_types::FactionSnapshot],
        popular_support: Option<f64>,
        alliance_breakdown: bool,
        rng: &mut dyn rand::RngCore,
        config: &TensionConfig,
    ) -> Vec<CoordinatedResponse> {
        let fired = self.conflict_evaluator.check_conflict_triggers(
            location,
            tension_value,
            factions,
            popular_support,
            alliance_breakdown,
            config,
        );

        fired
            .into_iter()
            .map(|trigger| {
                tracing::info!(trigger = %trigger.name, location = %location, "conflict trigger fired");
                let mut actions_taken = vec![format!("trigger_fired:{}", trigger.name)];
                if let Some(outcome) = self.conflict_evaluator.simulate_revolt(
                    location,
                    location_type,
                    tension_value,
                    factions.len(),
                    rng,
                    &self.env_engine,
                    config,
                ) {
                    actions_taken.push(format!(
                        "revolt:duration_hours={},casualties={}",
                        outcome.duration_hours,
                        outcome.casualties.total()
                    ));
                }
                CoordinatedResponse {
                    trigger_name: trigger.name,
                    actions_taken,
                }
            })
            .collect()
    }

    pub fn get_system_health(&self) -> SystemHealth {
        SystemHealth {
            faction_service_connected: self.faction_service_connected,
            event_bus_connected: self.event_bus_connected,
            stats: self.stats.snapshot(),
        }
    }

    /// Placeholder hook for callers that want to pre-warm or persist
    /// contributing-factor context alongside a prediction; currently just
    /// echoes the factors back, kept separate from `get_comprehensive_analysis`
    /// so callers can call it without paying for pattern/anomaly detection.
    pub fn summarize_contributing_factors(&self, prediction: &TensionPrediction) -> HashMap<String, f64> {
        prediction.contributing_factors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tension_engine::{ConfigRepository, InMemoryFactionRelationshipRepository, InMemoryTensionStateRepository};
    use tension_types::FixedClock;

    fn coordinator() -> (IntegrationCoordinator, Arc<FixedClock>, TensionConfig) {
        let clock = Arc::new(FixedClock::new(Timestamp::from_secs(0)));
        let stats = SharedStats::new();
        let env_engine = Arc::new(EnvironmentalTensionEngine::new(
            Arc::new(InMemoryTensionStateRepository::new()),
            clock.clone(),
            stats.clone(),
        ));
        let relationship_engine = Arc::new(FactionRelationshipEngine::new(
            Arc::new(InMemoryFactionRelationshipRepository::new()),
            clock.clone(),
            stats.clone(),
        ));
        let conflict_evaluator = Arc::new(ConflictEvaluator::new(clock.clone(), stats.clone()));
        let coordinator = IntegrationCoordinator::new(
            env_engine,
            relationship_engine,
            conflict_evaluator,
            clock.clone(),
            stats,
        );
        (coordinator, clock, ConfigRepository::new().defaults())
    }

    #[test]
    fn comprehensive_analysis_includes_current_tension_and_prediction() {
        let (coordinator, _clock, config) = coordinator();
        let location = LocationKey::region("r1");
        let analysis = coordinator.get_comprehensive_analysis(&location, "city", &SampleHistory::new(), &[], &config);
        assert!((analysis.current_tension - 0.2).abs() < 1e-9);
        assert_eq!(analysis.prediction.horizon_hours, 24);
    }

    #[test]
    fn system_health_reports_connection_flags() {
        let (coordinator, ..) = coordinator();
        let coordinator = coordinator.with_faction_service_connected(true);
        let health = coordinator.get_system_health();
        assert!(health.faction_service_connected);
        assert!(!health.event_bus_connected);
    }

    #[test]
    fn coordinated_response_is_empty_below_trigger_thresholds() {
        let (coordinator, _clock, config) = coordinator();
        let location = LocationKey::region("r1");
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::from_seed([7u8; 32]);
        let responses = coordinator.trigger_coordinated_response(
            &location, "city", 0.05, &[], None, false, &mut rng, &config,
        );
        assert!(responses.is_empty());
    }
}
