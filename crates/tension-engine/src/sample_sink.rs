//! Optional hook for recording settled tension readings, consumed by the
//! analytics layer.

use std::collections::HashMap;
use std::sync::RwLock;

use tension_types::{LocationKey, SampleHistory, TensionSample};

/// Receives one sample per settled tension calculation. The environmental
/// engine works with or without one attached.
pub trait SampleSink: Send + Sync {
    fn record(&self, sample: TensionSample);
}

/// In-memory sink keeping a bounded history per location.
#[derive(Debug, Default)]
pub struct InMemorySampleSink {
    histories: RwLock<HashMap<LocationKey, SampleHistory>>,
}

impl InMemorySampleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history_for(&self, key: &LocationKey) -> SampleHistory {
        self.histories
            .read()
            .expect("sample sink lock poisoned")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn all_locations(&self) -> Vec<LocationKey> {
        self.histories
            .read()
            .expect("sample sink lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl SampleSink for InMemorySampleSink {
    fn record(&self, sample: TensionSample) {
        self.histories
            .write()
            .expect("sample sink lock poisoned")
            .entry(sample.location.clone())
            .or_default()
            .push(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tension_types::Timestamp;

    #[test]
    fn sink_accumulates_history_per_location() {
        let sink = InMemorySampleSink::new();
        let key = LocationKey::region("r1");
        sink.record(TensionSample {
            location: key.clone(),
            value: 0.1,
            at: Timestamp::from_secs(0),
        });
        sink.record(TensionSample {
            location: key.clone(),
            value: 0.2,
            at: Timestamp::from_secs(10),
        });
        assert_eq!(sink.history_for(&key).len(), 2);
        assert_eq!(sink.all_locations(), vec![key]);
    }
}
