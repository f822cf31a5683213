//! Tension Simulation scenario runner: drives the environmental and
//! faction-relationship engines through a random event stream, then
//! prints a comprehensive analysis for each tracked region.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tension_analytics::IntegrationCoordinator;
use tension_engine::{
    ConfigRepository, ConflictEvaluator, EnvironmentalTensionEngine, FactionRelationshipEngine,
    InMemoryFactionRelationshipRepository, InMemoryTensionStateRepository, SharedStats,
};
use tension_types::{
    Clock, EventKind, EventParameters, FixedClock, LocationKey, SampleHistory, TensionEvent,
    Timestamp,
};

const REGIONS: &[(&str, &str)] = &[
    ("north_vale", "city"),
    ("old_mill", "village"),
    ("sunken_ruins", "ruins"),
    ("iron_pass", "mountains"),
];

/// Command line arguments for the tension simulation scenario runner.
#[derive(Parser, Debug)]
#[command(name = "tension-sim")]
#[command(about = "Runs a tension simulation scenario against an in-memory engine")]
struct Args {
    /// Random seed for reproducibility.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of simulated hours to advance between event batches.
    #[arg(long, default_value_t = 1)]
    hours_per_tick: u64,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Optional path to a TOML config file overriding the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write the final comprehensive analysis JSON report to.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn random_event_kind(rng: &mut SmallRng) -> EventKind {
    let pool = [
        EventKind::PlayerCombat,
        EventKind::NpcDeath,
        EventKind::NpcArrival,
        EventKind::EconomicChange,
        EventKind::PoliticalChange,
        EventKind::Festival,
    ];
    pool[rng.gen_range(0..pool.len())].clone()
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    println!("Tension Simulation Engine");
    println!("==========================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", args.ticks);
    println!("Hours per tick: {}", args.hours_per_tick);
    println!();

    let config = match &args.config {
        Some(path) => ConfigRepository::new()
            .from_file(path)
            .unwrap_or_else(|e| {
                eprintln!("Warning: could not load {}: {e}, using defaults", path.display());
                ConfigRepository::new().defaults()
            }),
        None => ConfigRepository::new().defaults(),
    };

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
        env_engine.clone(),
        relationship_engine.clone(),
        conflict_evaluator,
        clock.clone(),
        stats.clone(),
    );

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut histories: HashMap<String, SampleHistory> = REGIONS
        .iter()
        .map(|(id, _)| (id.to_string(), SampleHistory::new()))
        .collect();

    println!("Simulating...");
    for tick in 0..args.ticks {
        for (region_id, location_type) in REGIONS {
            let key = LocationKey::region(*region_id);
            let value = if rng.gen_bool(0.4) {
                let event = TensionEvent::new(format!("evt_{tick}_{region_id}"), random_event_kind(&mut rng), clock.now())
                    .at_location(key.clone())
                    .with_parameters(EventParameters::default().with_flag("lethal", rng.gen_bool(0.2)));
                env_engine.update_tension_from_event(&key, location_type, &event, &config)
            } else {
                env_engine.calculate_tension(&key, location_type, &config)
            };
            if let Some(history) = histories.get_mut(*region_id) {
                history.push(tension_types::TensionSample {
                    location: key,
                    value,
                    at: clock.now(),
                });
            }
        }
        clock.advance_hours(args.hours_per_tick as f64);

        if tick > 0 && tick % 50 == 0 {
            println!("Tick {} / {}", tick, args.ticks);
        }
    }

    fs::create_dir_all(&args.output_dir).unwrap_or_else(|e| {
        eprintln!("Warning: could not create {}: {e}", args.output_dir.display());
    });

    println!();
    println!("Final comprehensive analysis:");
    for (region_id, location_type) in REGIONS {
        let key = LocationKey::region(*region_id);
        let history = &histories[*region_id];
        let analysis = coordinator.get_comprehensive_analysis(&key, location_type, history, &[], &config);
        println!(
            "  {:<16} tension={:.3} patterns={} anomalies={}",
            region_id,
            analysis.current_tension,
            analysis.patterns.len(),
            analysis.anomalies.len()
        );
        write_report(&args.output_dir, region_id, &analysis);
    }

    println!();
    let health = coordinator.get_system_health();
    println!(
        "Done. {} tension updates, {} faction updates, {} conflicts triggered.",
        health.stats.total_tension_updates, health.stats.total_faction_updates, health.stats.conflicts_triggered
    );
}

fn write_report(output_dir: &Path, region_id: &str, analysis: &tension_analytics::ComprehensiveAnalysis) {
    let path = output_dir.join(format!("{region_id}_analysis.json"));
    match serde_json::to_string_pretty(analysis) {
        Ok(json) => {
            if let Err(e) = fs::write(&path, json) {
                eprintln!("Warning: could not write {}: {e}", path.display());
            }
        }
        Err(e) => eprintln!("Warning: could not serialize analysis for {region_id}: {e}"),
    }
}
