//! The stateful tension engine: environmental tension, faction
//! relationships, event impact scoring, conflict/revolt evaluation, and
//! configuration loading.

pub mod config;
pub mod conflict;
pub mod environmental;
pub mod error;
pub mod impact;
pub mod power;
pub mod relationships;
pub mod repository;
pub mod sample_sink;
pub mod stats;

pub use config::ConfigRepository;
pub use conflict::{ConflictEvaluator, RevoltCasualties, RevoltOutcome};
pub use environmental::EnvironmentalTensionEngine;
pub use error::{ConfigError, EngineError, FactionServiceError};
pub use impact::{apply_actor_impact, calculate_event_impact, ActorCategory};
pub use power::calculate_faction_power_score;
pub use relationships::FactionRelationshipEngine;
pub use repository::{
    faction_lookup_or_skip, FactionRelationshipRepository, FactionService,
    InMemoryFactionRelationshipRepository, InMemoryTensionStateRepository, StaticFactionService,
    TensionStateRepository,
};
pub use sample_sink::{InMemorySampleSink, SampleSink};
pub use stats::SharedStats;
