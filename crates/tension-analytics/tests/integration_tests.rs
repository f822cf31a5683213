//! End-to-end analytics scenarios built on top of a live engine, mirroring
//! how a game loop would feed settled tension readings into the
//! coordinator over time.

use std::sync::Arc;

use tension_analytics::IntegrationCoordinator;
use tension_engine::{
    ConfigRepository, ConflictEvaluator, EnvironmentalTensionEngine, FactionRelationshipEngine,
    InMemoryFactionRelationshipRepository, InMemoryTensionStateRepository, SharedStats,
};
use rand::SeedableRng;
use tension_types::{FixedClock, LocationKey, SampleHistory, TensionSample, Timestamp};

fn coordinator() -> (IntegrationCoordinator, Arc<FixedClock>) {
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
    let coordinator =
        IntegrationCoordinator::new(env_engine, relationship_engine, conflict_evaluator, clock.clone(), stats);
    (coordinator, clock)
}

fn rising_history(region_id: &str, start_secs: u64) -> SampleHistory {
    let mut history = SampleHistory::new();
    let location = LocationKey::region(region_id);
    for i in 0..40 {
        history.push(TensionSample {
            location: location.clone(),
            value: 0.1 + i as f64 * 0.015,
            at: Timestamp::from_secs(start_secs + i as u64 * 3600),
        });
    }
    history
}

#[test]
fn comprehensive_analysis_surfaces_trending_pattern_and_rising_prediction() {
    let (coordinator, _clock) = coordinator();
    let config = ConfigRepository::new().defaults();
    let history = rising_history("north_vale", 0);
    let location = LocationKey::region("north_vale");

    let analysis = coordinator.get_comprehensive_analysis(&location, "city", &history, &[], &config);

    assert!(analysis
        .patterns
        .iter()
        .any(|p| p.pattern_type == tension_types::PatternType::Trending));
    assert!(matches!(
        analysis.prediction.trend,
        tension_types::TensionTrend::Rising | tension_types::TensionTrend::Critical
    ));
}

#[test]
fn faction_relationships_are_included_and_deduplicated_across_queried_factions() {
    let (coordinator, _clock) = coordinator();
    let config = ConfigRepository::new().defaults();
    coordinator
        .trigger_coordinated_response(
            &LocationKey::region("r1"),
            "city",
            0.0,
            &[],
            None,
            false,
            &mut rand::rngs::SmallRng::seed_from_u64(42),
            &config,
        );

    // Build a relationship directly through the relationship engine so the
    // comprehensive analysis query has something to surface.
    let clock = Arc::new(FixedClock::new(Timestamp::from_secs(0)));
    let stats = SharedStats::new();
    let repo = Arc::new(InMemoryFactionRelationshipRepository::new());
    let relationship_engine = FactionRelationshipEngine::new(repo, clock, stats);
    relationship_engine.update_faction_tension("crows", "ravens", 20.0, "evt1", Timestamp::from_secs(0));

    let relationships = relationship_engine.get_faction_relationships_for_faction("crows");
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].faction_b_id, "ravens");
}

#[test]
fn system_health_reflects_recorded_engine_activity() {
    let (coordinator, _clock) = coordinator();
    let config = ConfigRepository::new().defaults();
    let location = LocationKey::region("r1");

    coordinator.get_comprehensive_analysis(&location, "city", &SampleHistory::new(), &[], &config);
    let health = coordinator.get_system_health();
    assert_eq!(health.stats.total_tension_updates, 0);
}
