//! Shared, thread-safe handle to the running [`EngineStats`] counters.

use std::sync::{Arc, Mutex};

use tension_types::{EngineStats, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct SharedStats(Arc<Mutex<EngineStats>>);

impl SharedStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> EngineStats {
        self.0.lock().expect("stats lock poisoned").clone()
    }

    pub fn increment_tension_updates(&self) {
        self.0.lock().expect("stats lock poisoned").total_tension_updates += 1;
    }

    pub fn increment_faction_updates(&self) {
        self.0.lock().expect("stats lock poisoned").total_faction_updates += 1;
    }

    pub fn increment_conflicts_triggered(&self) {
        self.0.lock().expect("stats lock poisoned").conflicts_triggered += 1;
    }

    pub fn increment_wars_triggered(&self) {
        self.0.lock().expect("stats lock poisoned").wars_triggered += 1;
    }

    pub fn increment_alliances_formed(&self) {
        self.0.lock().expect("stats lock poisoned").alliances_formed += 1;
    }

    pub fn increment_revolts_triggered(&self) {
        self.0.lock().expect("stats lock poisoned").revolts_triggered += 1;
    }

    pub fn add_modifiers_expired(&self, count: u64) {
        self.0.lock().expect("stats lock poisoned").modifiers_expired += count;
    }

    pub fn record_global_update(&self, at: Timestamp) {
        self.0.lock().expect("stats lock poisoned").last_global_update = Some(at);
    }

    pub fn record_modifier_cleanup(&self, at: Timestamp) {
        self.0.lock().expect("stats lock poisoned").last_modifier_cleanup = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment_independently() {
        let stats = SharedStats::new();
        stats.increment_tension_updates();
        stats.increment_tension_updates();
        stats.increment_wars_triggered();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_tension_updates, 2);
        assert_eq!(snapshot.wars_triggered, 1);
    }
}
