//! Pattern detection over a location's tension history.

use std::collections::HashMap;

use tension_types::{LocationKey, PatternDetection, PatternType, SampleHistory, Timestamp, TensionSample};

use crate::mathutil::{linear_slope, mean, sample_size_confidence_factor, stddev, variance};

#[derive(Debug, Clone)]
pub struct PatternAnalyzerConfig {
    pub pattern_min_occurrences: usize,
    pub analysis_window_days: f64,
    pub confidence_threshold: f64,
}

impl Default for PatternAnalyzerConfig {
    fn default() -> Self {
        Self {
            pattern_min_occurrences: 3,
            analysis_window_days: 30.0,
            confidence_threshold: 0.7,
        }
    }
}

pub struct PatternAnalyzer {
    config: PatternAnalyzerConfig,
}

impl PatternAnalyzer {
    pub fn new(config: PatternAnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PatternAnalyzerConfig::default())
    }

    /// Runs every pattern detector over the windowed history and returns
    /// the detections whose sample-size-adjusted confidence clears the
    /// configured threshold.
    pub fn analyze_tension_patterns(
        &self,
        location: &LocationKey,
        history: &SampleHistory,
        now: Timestamp,
    ) -> Vec<PatternDetection> {
        let window_hours = self.config.analysis_window_days * 24.0;
        let windowed = history.window(now, window_hours);
        let values: Vec<f64> = windowed.iter().map(|s| s.value).collect();
        let factor = sample_size_confidence_factor(values.len());

        let mut detections = Vec::new();
        detections.extend(self.detect_stability_patterns(location, &values, factor, now));
        detections.extend(self.detect_trending_patterns(location, &values, factor, now));
        detections.extend(self.detect_spike_patterns(location, &values, factor, now));
        detections.extend(self.detect_cyclic_patterns(location, &windowed, factor, now));

        detections
            .into_iter()
            .filter(|d| d.confidence >= self.config.confidence_threshold)
            .collect()
    }

    fn detect_stability_patterns(
        &self,
        location: &LocationKey,
        values: &[f64],
        factor: f64,
        now: Timestamp,
    ) -> Vec<PatternDetection> {
        if values.len() < 2 {
            return Vec::new();
        }
        let var = variance(values);

        let mut out = Vec::new();
        if var < 0.01 {
            out.push(self.detection(
                PatternType::Stable,
                location,
                0.9 * factor,
                "tension has held steady with low variance",
                now,
                HashMap::from([("variance".to_string(), var)]),
            ));
        } else if var > 0.05 {
            out.push(self.detection(
                PatternType::Volatile,
                location,
                0.8 * factor,
                "tension is swinging widely relative to its mean",
                now,
                HashMap::from([("variance".to_string(), var)]),
            ));
        }
        out
    }

    fn detect_trending_patterns(
        &self,
        location: &LocationKey,
        values: &[f64],
        factor: f64,
        now: Timestamp,
    ) -> Vec<PatternDetection> {
        if values.len() < 4 {
            return Vec::new();
        }
        let slope = linear_slope(values);
        if slope.abs() <= 0.001 {
            return Vec::new();
        }
        let confidence = (slope.abs() * 1000.0).min(0.9) * factor;
        vec![self.detection(
            PatternType::Trending,
            location,
            confidence,
            if slope > 0.0 {
                "tension is trending upward"
            } else {
                "tension is trending downward"
            },
            now,
            HashMap::from([("slope".to_string(), slope)]),
        )]
    }

    fn detect_spike_patterns(
        &self,
        location: &LocationKey,
        values: &[f64],
        factor: f64,
        now: Timestamp,
    ) -> Vec<PatternDetection> {
        if values.len() < 3 {
            return Vec::new();
        }
        let m = mean(values);
        let sd = stddev(values);
        if sd <= f64::EPSILON {
            return Vec::new();
        }
        let spike_magnitudes: Vec<f64> = values
            .iter()
            .map(|v| (v - m).abs())
            .filter(|&mag| mag > 2.0 * sd)
            .collect();
        if spike_magnitudes.len() < 2 {
            return Vec::new();
        }
        let avg_magnitude = mean(&spike_magnitudes);
        // Spec leaves spike confidence unspecified; scaled the same way the
        // statistical anomaly detector turns a z-score into a severity.
        let avg_z = avg_magnitude / sd;
        let confidence = (avg_z / 5.0).min(1.0) * factor;
        vec![self.detection(
            PatternType::Spike,
            location,
            confidence,
            "tension spiked sharply away from its recent mean",
            now,
            HashMap::from([
                ("spike_count".to_string(), spike_magnitudes.len() as f64),
                ("average_magnitude".to_string(), avg_magnitude),
            ]),
        )]
    }

    fn detect_cyclic_patterns(
        &self,
        location: &LocationKey,
        samples: &[&TensionSample],
        factor: f64,
        now: Timestamp,
    ) -> Vec<PatternDetection> {
        if samples.len() < self.config.pattern_min_occurrences * 2 {
            return Vec::new();
        }
        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); 24];
        for sample in samples {
            let hour = ((sample.at.0 / 3600) % 24) as usize;
            buckets[hour].push(sample.value);
        }

        let bucket_variances: Vec<f64> = buckets.iter().map(|b| variance(b)).collect();
        let max_variance = bucket_variances.iter().cloned().fold(0.0_f64, f64::max);
        if max_variance <= 0.01 {
            return Vec::new();
        }

        let peak_hours: Vec<usize> = bucket_variances
            .iter()
            .enumerate()
            .filter(|(_, &v)| (v - max_variance).abs() < f64::EPSILON)
            .map(|(hour, _)| hour)
            .collect();

        let mut parameters = HashMap::from([
            ("cycle_length_hours".to_string(), 24.0),
            ("max_hourly_variance".to_string(), max_variance),
            ("peak_hour_count".to_string(), peak_hours.len() as f64),
        ]);
        if let Some(&first_peak) = peak_hours.first() {
            parameters.insert("peak_hour".to_string(), first_peak as f64);
        }

        vec![self.detection(
            PatternType::Cyclic,
            location,
            0.8 * factor,
            "tension recurs on a roughly daily cycle",
            now,
            parameters,
        )]
    }

    fn detection(
        &self,
        pattern_type: PatternType,
        location: &LocationKey,
        confidence: f64,
        description: &str,
        now: Timestamp,
        params: HashMap<String, f64>,
    ) -> PatternDetection {
        PatternDetection {
            pattern_type,
            region_id: location.region_id.clone(),
            poi_id: location.poi_id.clone(),
            confidence,
            description: description.to_string(),
            detected_at: now,
            pattern_parameters: params,
            historical_occurrences: 1,
            predicted_next_occurrence: None,
        }
    }
}
