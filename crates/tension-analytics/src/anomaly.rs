//! Anomaly detection: statistical (deviation from a location's own
//! history), temporal (deviation from its usual update cadence), and
//! contextual (deviation from peer locations at the same instant).

use std::collections::VecDeque;
use std::sync::RwLock;

use tension_types::{AnomalyDetection, AnomalyType, LocationKey, SampleHistory, Timestamp};

use crate::mathutil::{mean, stddev};

/// Bound on retained anomaly detections, matching the original's capped
/// `anomaly_history` list.
pub const ANOMALY_HISTORY_BOUND: usize = 1_000;

#[derive(Debug, Clone)]
pub struct AnomalyDetectorConfig {
    pub anomaly_threshold: f64,
}

impl Default for AnomalyDetectorConfig {
    fn default() -> Self {
        Self { anomaly_threshold: 2.5 }
    }
}

pub struct AnomalyDetector {
    config: AnomalyDetectorConfig,
    history: RwLock<VecDeque<AnomalyDetection>>,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyDetectorConfig) -> Self {
        Self {
            config,
            history: RwLock::new(VecDeque::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnomalyDetectorConfig::default())
    }

    pub fn recorded_anomalies(&self) -> Vec<AnomalyDetection> {
        self.history.read().expect("anomaly history lock poisoned").iter().cloned().collect()
    }

    fn record(&self, detection: AnomalyDetection) {
        let mut history = self.history.write().expect("anomaly history lock poisoned");
        history.push_back(detection);
        while history.len() > ANOMALY_HISTORY_BOUND {
            history.pop_front();
        }
    }

    /// Runs the statistical and temporal detectors against a location's own
    /// history, records and returns whatever fires.
    pub fn detect_anomalies(&self, location: &LocationKey, samples: &SampleHistory, now: Timestamp) -> Vec<AnomalyDetection> {
        let mut found = Vec::new();
        if let Some(d) = self.detect_statistical_anomaly(location, samples, now) {
            found.push(d);
        }
        if let Some(d) = self.detect_temporal_anomaly(location, samples, now) {
            found.push(d);
        }
        for d in &found {
            self.record(d.clone());
        }
        found
    }

    fn detect_statistical_anomaly(&self, location: &LocationKey, samples: &SampleHistory, now: Timestamp) -> Option<AnomalyDetection> {
        let values = samples.values();
        if values.len() < 5 {
            return None;
        }
        let (history, last) = values.split_at(values.len() - 1);
        let last = last[0];
        let m = mean(history);
        let sd = stddev(history).max(1e-6);
        let z = (last - m) / sd;
        if z.abs() < self.config.anomaly_threshold {
            return None;
        }
        Some(AnomalyDetection {
            anomaly_type: AnomalyType::Statistical,
            region_id: location.region_id.clone(),
            poi_id: location.poi_id.clone(),
            severity: (z.abs() / (self.config.anomaly_threshold * 2.0)).min(1.0),
            deviation_score: z,
            contributing_factors: vec!["reading_far_from_historical_mean".to_string()],
            recommended_actions: vec!["review recent events at this location".to_string()],
            detected_at: now,
        })
    }

    /// Compares the current reading against the historical average for the
    /// same hour-of-day, so a location that's always calm at 3am but spikes
    /// now still reads as anomalous even if it's unremarkable against its
    /// all-hours mean.
    fn detect_temporal_anomaly(&self, location: &LocationKey, samples: &SampleHistory, now: Timestamp) -> Option<AnomalyDetection> {
        if samples.len() < 5 {
            return None;
        }
        let current_hour = (now.0 / 3600) % 24;
        let current = samples.iter().last()?.value;
        let same_hour_values: Vec<f64> = samples
            .iter()
            .rev()
            .skip(1)
            .filter(|s| (s.at.0 / 3600) % 24 == current_hour)
            .map(|s| s.value)
            .collect();
        if same_hour_values.len() < 2 {
            return None;
        }
        let expected = mean(&same_hour_values);
        let deviation = (current - expected).abs();
        if deviation <= 0.2 {
            return None;
        }
        Some(AnomalyDetection {
            anomaly_type: AnomalyType::Temporal,
            region_id: location.region_id.clone(),
            poi_id: location.poi_id.clone(),
            severity: (deviation / 0.5).min(1.0),
            deviation_score: deviation,
            contributing_factors: vec!["tension_deviates_from_hour_of_day_expectation".to_string()],
            recommended_actions: vec!["check for missed or duplicated updates".to_string()],
            detected_at: now,
        })
    }

    /// Compares `location_value` against a population of peer readings
    /// taken at roughly the same instant, recording and returning a
    /// contextual anomaly if it stands out from its peers even though it
    /// may be unremarkable against its own history.
    pub fn detect_contextual_anomaly(
        &self,
        location: &LocationKey,
        location_value: f64,
        peer_values: &[f64],
        now: Timestamp,
    ) -> Option<AnomalyDetection> {
        if peer_values.len() < 5 {
            return None;
        }
        let average = mean(peer_values);
        let deviation = (location_value - average).abs();
        if deviation <= 0.3 {
            return None;
        }
        let detection = AnomalyDetection {
            anomaly_type: AnomalyType::Contextual,
            region_id: location.region_id.clone(),
            poi_id: location.poi_id.clone(),
            severity: (deviation / 0.6).min(1.0),
            deviation_score: deviation,
            contributing_factors: vec!["deviates_from_peer_locations".to_string()],
            recommended_actions: vec!["compare against neighboring regions".to_string()],
            detected_at: now,
        };
        self.record(detection.clone());
        Some(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tension_types::TensionSample;

    fn history_from(values: &[f64]) -> SampleHistory {
        let mut history = SampleHistory::new();
        let location = LocationKey::region("r1");
        for (i, v) in values.iter().enumerate() {
            history.push(TensionSample {
                location: location.clone(),
                value: *v,
                at: Timestamp::from_secs(i as u64 * 3600),
            });
        }
        history
    }

    #[test]
    fn statistical_anomaly_fires_on_outlier_reading() {
        let detector = AnomalyDetector::with_defaults();
        let mut values = vec![0.3; 9];
        values.push(0.99);
        let history = history_from(&values);
        let detections = detector.detect_anomalies(&LocationKey::region("r1"), &history, Timestamp::from_secs(9 * 3600));
        assert!(detections.iter().any(|d| d.anomaly_type == AnomalyType::Statistical));
        assert_eq!(detector.recorded_anomalies().len(), detections.len());
    }

    #[test]
    fn temporal_anomaly_fires_when_current_hour_breaks_its_own_pattern() {
        let detector = AnomalyDetector::with_defaults();
        let location = LocationKey::region("r1");
        let mut history = SampleHistory::new();
        // Hour 5 has always read calm (0.2) across several prior days; the
        // most recent sample, also at hour 5, reads hot (0.9) instead.
        for day in 0..5u64 {
            history.push(TensionSample {
                location: location.clone(),
                value: 0.2,
                at: Timestamp::from_secs(day * 24 * 3600 + 5 * 3600),
            });
        }
        history.push(TensionSample {
            location: location.clone(),
            value: 0.9,
            at: Timestamp::from_secs(5 * 24 * 3600 + 5 * 3600),
        });
        let now = Timestamp::from_secs(5 * 24 * 3600 + 5 * 3600);
        let detections = detector.detect_anomalies(&location, &history, now);
        assert!(detections.iter().any(|d| d.anomaly_type == AnomalyType::Temporal));
    }

    #[test]
    fn contextual_anomaly_compares_against_peers() {
        let detector = AnomalyDetector::with_defaults();
        let peers = vec![0.2, 0.21, 0.19, 0.22, 0.2, 0.2];
        let detection = detector.detect_contextual_anomaly(&LocationKey::region("r1"), 0.9, &peers, Timestamp::from_secs(0));
        assert!(detection.is_some());
    }

    #[test]
    fn history_is_capped_at_bound() {
        let detector = AnomalyDetector::with_defaults();
        for i in 0..(ANOMALY_HISTORY_BOUND + 5) {
            detector.detect_contextual_anomaly(
                &LocationKey::region("r1"),
                10.0,
                &[0.1, 0.1, 0.1, 0.1, 0.1],
                Timestamp::from_secs(i as u64),
            );
        }
        assert_eq!(detector.recorded_anomalies().len(), ANOMALY_HISTORY_BOUND);
    }
}
