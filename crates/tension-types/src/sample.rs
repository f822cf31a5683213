//! Historical tension samples, used by the analytics layer.

use crate::clock::Timestamp;
use crate::location::LocationKey;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single recorded tension reading at a point in time, captured whenever
/// the environmental engine settles a location's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionSample {
    pub location: LocationKey,
    pub value: f64,
    pub at: Timestamp,
}

/// Per-location bound on how many samples are retained for pattern and
/// anomaly analysis.
pub const SAMPLE_HISTORY_BOUND: usize = 10_000;

/// A bounded ring buffer of samples for one location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleHistory {
    samples: VecDeque<TensionSample>,
}

impl SampleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: TensionSample) {
        self.samples.push_back(sample);
        while self.samples.len() > SAMPLE_HISTORY_BOUND {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TensionSample> {
        self.samples.iter()
    }

    /// Samples within `window_hours` of `now`, oldest first.
    pub fn window(&self, now: Timestamp, window_hours: f64) -> Vec<&TensionSample> {
        self.samples
            .iter()
            .filter(|s| s.at.hours_until(now) <= window_hours && s.at <= now)
            .collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64, secs: u64) -> TensionSample {
        TensionSample {
            location: LocationKey::region("r1"),
            value,
            at: Timestamp::from_secs(secs),
        }
    }

    #[test]
    fn history_drops_oldest_beyond_bound() {
        let mut history = SampleHistory::new();
        for i in 0..(SAMPLE_HISTORY_BOUND + 10) {
            history.push(sample(0.1, i as u64));
        }
        assert_eq!(history.len(), SAMPLE_HISTORY_BOUND);
        assert_eq!(history.iter().next().unwrap().at, Timestamp::from_secs(10));
    }

    #[test]
    fn window_filters_by_elapsed_hours() {
        let mut history = SampleHistory::new();
        history.push(sample(0.1, 0));
        history.push(sample(0.2, 3600 * 10));
        history.push(sample(0.3, 3600 * 30));
        let now = Timestamp::from_secs(3600 * 30);
        let windowed = history.window(now, 24.0);
        assert_eq!(windowed.len(), 2);
    }
}
