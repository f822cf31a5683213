//! Read-only derived views over the tension engine's state: pattern
//! detection, anomaly detection, player behavior profiling, regional
//! correlation, prediction, and the integration coordinator that ties them
//! together with the stateful engine.

pub mod anomaly;
pub mod behavior;
pub mod coordinator;
pub mod mathutil;
pub mod pattern;
pub mod prediction;
pub mod regional;

pub use anomaly::{AnomalyDetector, AnomalyDetectorConfig, ANOMALY_HISTORY_BOUND};
pub use behavior::BehaviorAnalyzer;
pub use coordinator::{ComprehensiveAnalysis, CoordinatedResponse, IntegrationCoordinator};
pub use pattern::{PatternAnalyzer, PatternAnalyzerConfig};
pub use prediction::{PredictionModelWeights, PredictionSignals, TensionPredictionEngine};
pub use regional::{RegionalAnalyzer, RegionalPatternReport};
