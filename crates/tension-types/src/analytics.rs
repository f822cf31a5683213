//! Pattern, anomaly, and prediction data model consumed by `tension-analytics`.

use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Cyclic,
    Trending,
    Spike,
    Anomaly,
    Stable,
    Volatile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDetection {
    pub pattern_type: PatternType,
    pub region_id: String,
    pub poi_id: Option<String>,
    pub confidence: f64,
    pub description: String,
    pub detected_at: Timestamp,
    pub pattern_parameters: HashMap<String, f64>,
    pub historical_occurrences: u32,
    pub predicted_next_occurrence: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    Statistical,
    Temporal,
    Contextual,
    Collective,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyDetection {
    pub anomaly_type: AnomalyType,
    pub region_id: String,
    pub poi_id: Option<String>,
    pub severity: f64,
    pub deviation_score: f64,
    pub contributing_factors: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub detected_at: Timestamp,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerBehaviorProfile {
    pub player_id: String,
    pub behavior_patterns: HashMap<String, f64>,
    pub tension_impact_history: Vec<f64>,
    pub preferred_regions: Vec<String>,
    pub activity_patterns: HashMap<String, f64>,
    pub risk_assessment: f64,
    pub last_updated: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionConfidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensionTrend {
    Stable,
    Rising,
    Falling,
    Volatile,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionPrediction {
    pub region_id: String,
    pub poi_id: Option<String>,
    pub predicted_value: f64,
    pub trend: TensionTrend,
    pub confidence: PredictionConfidence,
    pub horizon_hours: u32,
    pub contributing_factors: HashMap<String, f64>,
    pub generated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictOutbreakPrediction {
    pub region_id: String,
    pub trigger_name: String,
    pub probability: f64,
    pub estimated_horizon_hours: u32,
    pub confidence: PredictionConfidence,
    pub generated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_detection_serializes_snake_case_type() {
        let pattern = PatternDetection {
            pattern_type: PatternType::Spike,
            region_id: "r1".to_string(),
            poi_id: None,
            confidence: 0.9,
            description: "spike".to_string(),
            detected_at: Timestamp::from_secs(0),
            pattern_parameters: HashMap::new(),
            historical_occurrences: 1,
            predicted_next_occurrence: None,
        };
        let json = serde_json::to_string(&pattern).unwrap();
        assert!(json.contains("\"spike\""));
    }
}
