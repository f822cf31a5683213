//! Shared data model for the tension simulation: locations, time, state,
//! faction relationships, events, samples, configuration, and the outbound
//! bus contract. No engine logic lives here.

pub mod analytics;
pub mod bus;
pub mod clock;
pub mod config;
pub mod event;
pub mod faction;
pub mod location;
pub mod modifier;
pub mod sample;
pub mod state;
pub mod stats;

pub use analytics::{
    AnomalyDetection, AnomalyType, ConflictOutbreakPrediction, PatternDetection, PatternType,
    PlayerBehaviorProfile, PredictionConfidence, TensionPrediction, TensionTrend,
};
pub use bus::{topics, BusPayload, BusPublishError, EventBus, RecordingEventBus};
pub use clock::{Clock, FixedClock, SystemClock, Timestamp};
pub use config::{
    CalculationConstants, ConflictRequirements, ConflictTrigger, EventImpactConfig,
    LocationConfig, RevoltConfig, RevoltProbabilityConstants, SeverityThresholds, TensionConfig,
    TensionLimits,
};
pub use event::{EventKind, EventParameters, TensionEvent};
pub use faction::{
    canonical_pair, FactionRelationship, FactionRelationshipEvent, RelationshipType,
    FACTION_RECENT_EVENTS_WINDOW_HOURS,
};
pub use location::{LocationKey, PoiType};
pub use modifier::TensionModifier;
pub use sample::{SampleHistory, TensionSample, SAMPLE_HISTORY_BOUND};
pub use state::{TensionState, RECENT_EVENTS_BOUND};
pub use stats::{EngineStats, FactionSnapshot, HiddenAttributes, SystemHealth};
