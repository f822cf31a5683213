//! Regional-scale pattern synthesis: per-POI patterns combined with
//! cross-POI correlation, used by the comprehensive analysis query.

use std::collections::HashMap;

use tension_types::{LocationKey, PatternDetection, SampleHistory, Timestamp};

use crate::mathutil::pearson_correlation;
use crate::pattern::PatternAnalyzer;

#[derive(Debug, Clone, Default)]
pub struct RegionalPatternReport {
    pub poi_patterns: HashMap<String, Vec<PatternDetection>>,
    pub regional_trend: Option<PatternDetection>,
    /// Pairwise POI correlation, keyed by `"poi_a:poi_b"`. A placeholder of
    /// `0.3` is used for pairs without at least 30 paired samples, matching
    /// the data-starved fallback in the original analyzer.
    pub correlation_analysis: HashMap<String, f64>,
}

/// Placeholder correlation used when a POI pair doesn't have enough paired
/// samples for a real Pearson coefficient.
const SPARSE_DATA_CORRELATION_PLACEHOLDER: f64 = 0.3;
const MIN_PAIRED_SAMPLES_FOR_CORRELATION: usize = 30;

pub struct RegionalAnalyzer<'a> {
    pattern_analyzer: &'a PatternAnalyzer,
}

impl<'a> RegionalAnalyzer<'a> {
    pub fn new(pattern_analyzer: &'a PatternAnalyzer) -> Self {
        Self { pattern_analyzer }
    }

    /// `poi_histories` maps poi id to its sample history; `region_history`
    /// is the region-level aggregate used for the overall regional trend.
    pub fn identify_regional_patterns(
        &self,
        region_id: &str,
        poi_histories: &HashMap<String, SampleHistory>,
        region_history: &SampleHistory,
        now: Timestamp,
    ) -> RegionalPatternReport {
        let mut poi_patterns = HashMap::new();
        for (poi_id, history) in poi_histories {
            let key = LocationKey::poi(region_id, poi_id.clone());
            poi_patterns.insert(
                poi_id.clone(),
                self.pattern_analyzer.analyze_tension_patterns(&key, history, now),
            );
        }

        let region_key = LocationKey::region(region_id);
        let regional_patterns = self
            .pattern_analyzer
            .analyze_tension_patterns(&region_key, region_history, now);
        let regional_trend = regional_patterns.into_iter().next();

        let correlation_analysis = self.correlate_pois(poi_histories);

        RegionalPatternReport {
            poi_patterns,
            regional_trend,
            correlation_analysis,
        }
    }

    fn correlate_pois(&self, poi_histories: &HashMap<String, SampleHistory>) -> HashMap<String, f64> {
        let mut result = HashMap::new();
        let ids: Vec<&String> = poi_histories.keys().collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                let a = &poi_histories[ids[i]];
                let b = &poi_histories[ids[j]];
                let pair_key = format!("{}:{}", ids[i], ids[j]);
                let paired_len = a.len().min(b.len());
                let correlation = if paired_len >= MIN_PAIRED_SAMPLES_FOR_CORRELATION {
                    let a_values: Vec<f64> = a.values().into_iter().rev().take(paired_len).collect();
                    let b_values: Vec<f64> = b.values().into_iter().rev().take(paired_len).collect();
                    pearson_correlation(&a_values, &b_values)
                } else {
                    SPARSE_DATA_CORRELATION_PLACEHOLDER
                };
                result.insert(pair_key, correlation);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tension_types::TensionSample;

    fn history_of(values: &[f64]) -> SampleHistory {
        let mut h = SampleHistory::new();
        for (i, v) in values.iter().enumerate() {
            h.push(TensionSample {
                location: LocationKey::region("r1"),
                value: *v,
                at: Timestamp::from_secs(i as u64 * 3600),
            });
        }
        h
    }

    #[test]
    fn sparse_pois_use_placeholder_correlation() {
        let analyzer = PatternAnalyzer::with_defaults();
        let regional = RegionalAnalyzer::new(&analyzer);
        let mut poi_histories = HashMap::new();
        poi_histories.insert("poi_a".to_string(), history_of(&[0.1, 0.2, 0.3]));
        poi_histories.insert("poi_b".to_string(), history_of(&[0.4, 0.3, 0.2]));
        let report = regional.identify_regional_patterns(
            "r1",
            &poi_histories,
            &history_of(&[0.2; 10]),
            Timestamp::from_secs(10 * 3600),
        );
        let key = report.correlation_analysis.keys().next().unwrap();
        assert_eq!(report.correlation_analysis[key], SPARSE_DATA_CORRELATION_PLACEHOLDER);
    }
}
