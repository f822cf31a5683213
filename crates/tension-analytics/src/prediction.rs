//! Forward-looking predictions: tension escalation, conflict outbreak
//! probability, and regional stability forecasts, all built from the same
//! weighted-factor model.

use std::collections::HashMap;

use tension_types::{
    ConflictOutbreakPrediction, PredictionConfidence, SampleHistory, Timestamp, TensionPrediction,
    TensionTrend,
};

use crate::mathutil::{linear_slope, mean, sample_size_confidence_factor, stddev};

/// Relative weight each factor contributes to a tension-escalation
/// prediction. Mirrors the weighted scoring used for faction power, but
/// tuned for forecasting rather than ranking.
#[derive(Debug, Clone, Copy)]
pub struct PredictionModelWeights {
    pub historical_tension: f64,
    pub recent_events: f64,
    pub player_actions: f64,
    pub faction_relationships: f64,
    pub economic_factors: f64,
    pub seasonal_patterns: f64,
    pub external_events: f64,
}

impl Default for PredictionModelWeights {
    fn default() -> Self {
        Self {
            historical_tension: 0.3,
            recent_events: 0.25,
            player_actions: 0.2,
            faction_relationships: 0.15,
            economic_factors: 0.1,
            seasonal_patterns: 0.05,
            external_events: 0.05,
        }
    }
}

/// The subset of prediction inputs that vary per call; historical_tension
/// and recent_events are derived directly from the sample history, the
/// rest are supplied by the caller since they live outside this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionSignals {
    pub player_actions: f64,
    pub faction_relationships: f64,
    pub economic_factors: f64,
    pub seasonal_patterns: f64,
    pub external_events: f64,
}

pub struct TensionPredictionEngine {
    weights: PredictionModelWeights,
}

impl TensionPredictionEngine {
    pub fn new(weights: PredictionModelWeights) -> Self {
        Self { weights }
    }

    pub fn with_defaults() -> Self {
        Self::new(PredictionModelWeights::default())
    }

    /// Projects tension `horizon_hours` ahead by blending the recent trend
    /// line with the weighted-factor model, clamped to `[0, 1]`.
    pub fn predict_tension_escalation(
        &self,
        region_id: &str,
        poi_id: Option<String>,
        history: &SampleHistory,
        signals: PredictionSignals,
        horizon_hours: u32,
        now: Timestamp,
    ) -> TensionPrediction {
        let values = history.values();
        let historical_tension = values.last().copied().unwrap_or(0.0);
        let recent: Vec<f64> = values.iter().rev().take(10).copied().collect();
        let slope = linear_slope(&recent);
        let recent_events_factor = (slope * recent.len() as f64).clamp(-1.0, 1.0);

        let weighted = historical_tension * self.weights.historical_tension
            + recent_events_factor * self.weights.recent_events
            + signals.player_actions * self.weights.player_actions
            + signals.faction_relationships * self.weights.faction_relationships
            + signals.economic_factors * self.weights.economic_factors
            + signals.seasonal_patterns * self.weights.seasonal_patterns
            + signals.external_events * self.weights.external_events;

        let projected = (historical_tension + weighted * (horizon_hours as f64 / 24.0)).clamp(0.0, 1.0);

        let trend = if projected >= 0.85 {
            TensionTrend::Critical
        } else if stddev(&recent) > 0.25 {
            TensionTrend::Volatile
        } else if projected - historical_tension > 0.05 {
            TensionTrend::Rising
        } else if historical_tension - projected > 0.05 {
            TensionTrend::Falling
        } else {
            TensionTrend::Stable
        };

        let confidence = self.confidence_for(values.len());

        let mut contributing_factors = HashMap::new();
        contributing_factors.insert("historical_tension".to_string(), historical_tension);
        contributing_factors.insert("recent_trend_slope".to_string(), slope);
        contributing_factors.insert("player_actions".to_string(), signals.player_actions);
        contributing_factors.insert("faction_relationships".to_string(), signals.faction_relationships);

        TensionPrediction {
            region_id: region_id.to_string(),
            poi_id,
            predicted_value: projected,
            trend,
            confidence,
            horizon_hours,
            contributing_factors,
            generated_at: now,
        }
    }

    /// Estimates the probability a named conflict trigger fires within
    /// `estimated_horizon_hours`, from how close current tension sits to
    /// the trigger's activation threshold and how fast it's climbing.
    pub fn predict_conflict_outbreak(
        &self,
        region_id: &str,
        trigger_name: &str,
        current_tension: f64,
        trigger_threshold: f64,
        history: &SampleHistory,
        estimated_horizon_hours: u32,
        now: Timestamp,
    ) -> ConflictOutbreakPrediction {
        let values = history.values();
        let recent: Vec<f64> = values.iter().rev().take(10).copied().collect();
        let slope = linear_slope(&recent);

        let gap = (trigger_threshold - current_tension).max(0.0);
        let proximity = if trigger_threshold > 0.0 {
            (1.0 - gap / trigger_threshold).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let momentum = (slope * 10.0).clamp(0.0, 1.0);
        let probability = (proximity * 0.7 + momentum * 0.3).clamp(0.0, 1.0);

        ConflictOutbreakPrediction {
            region_id: region_id.to_string(),
            trigger_name: trigger_name.to_string(),
            probability,
            estimated_horizon_hours,
            confidence: self.confidence_for(values.len()),
            generated_at: now,
        }
    }

    /// A coarse multi-horizon forecast for a region: tension predictions
    /// at 24h, 72h, and 168h (one week) out.
    pub fn get_regional_stability_forecast(
        &self,
        region_id: &str,
        history: &SampleHistory,
        signals: PredictionSignals,
        now: Timestamp,
    ) -> Vec<TensionPrediction> {
        [24u32, 72, 168]
            .into_iter()
            .map(|horizon| self.predict_tension_escalation(region_id, None, history, signals, horizon, now))
            .collect()
    }

    fn confidence_for(&self, sample_count: usize) -> PredictionConfidence {
        let factor = sample_size_confidence_factor(sample_count);
        if factor >= 1.0 {
            PredictionConfidence::VeryHigh
        } else if factor >= 0.7 {
            PredictionConfidence::High
        } else if sample_count >= 3 {
            PredictionConfidence::Medium
        } else {
            PredictionConfidence::Low
        }
    }
}
