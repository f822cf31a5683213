//! Environmental tension engine: per-location tension state, decay, and
//! event-driven updates.

use std::sync::Arc;

use tension_types::{
    Clock, LocationKey, TensionConfig, TensionEvent, TensionModifier, TensionState,
};
use uuid::Uuid;

use crate::impact::calculate_event_impact;
use crate::repository::TensionStateRepository;
use crate::sample_sink::SampleSink;
use crate::stats::SharedStats;

/// Stateful engine for environmental (region/POI) tension. Owns no state
/// itself — all reads and writes go through the injected repository, so the
/// same engine value can be shared across threads behind an `Arc`.
pub struct EnvironmentalTensionEngine {
    state_repo: Arc<dyn TensionStateRepository>,
    clock: Arc<dyn Clock>,
    sample_sink: Option<Arc<dyn SampleSink>>,
    stats: SharedStats,
}

impl EnvironmentalTensionEngine {
    pub fn new(state_repo: Arc<dyn TensionStateRepository>, clock: Arc<dyn Clock>, stats: SharedStats) -> Self {
        Self {
            state_repo,
            clock,
            sample_sink: None,
            stats,
        }
    }

    pub fn with_sample_sink(mut self, sink: Arc<dyn SampleSink>) -> Self {
        self.sample_sink = Some(sink);
        self
    }

    /// Loads or creates the state for `key`, decays it to `now`, sweeps
    /// expired modifiers, and persists the result. Returns the settled
    /// value. This is the single step both `calculate_tension` and
    /// `update_tension_from_event` route through.
    fn settle(&self, key: &LocationKey, location_type: &str, config: &TensionConfig) -> TensionState {
        let now = self.clock.now();
        let loc_config = config.location_config_for(location_type);

        let mut state = self.state_repo.get(key).unwrap_or_else(|| {
            TensionState::new(key.clone(), loc_config.base_tension, now)
        });

        let elapsed_hours = state.last_updated.hours_until(now).max(0.0);
        let decay_amount = loc_config.decay_rate * elapsed_hours;
        state.value = (state.value - decay_amount).max(loc_config.min_tension);

        let expired = state.sweep_expired_modifiers(now);
        if expired > 0 {
            self.stats.add_modifiers_expired(expired as u64);
        }

        state.value += state.active_modifier_sum(now);
        state.value = state.value.clamp(loc_config.min_tension, loc_config.max_tension);
        if now > state.last_updated {
            state.last_updated = now;
        }

        self.state_repo.save(state.clone());
        if let Some(sink) = &self.sample_sink {
            sink.record(tension_types::TensionSample {
                location: key.clone(),
                value: state.value,
                at: now,
            });
        }
        state
    }

    /// Returns the current, freshly-settled tension value for a location.
    pub fn calculate_tension(&self, key: &LocationKey, location_type: &str, config: &TensionConfig) -> f64 {
        self.settle(key, location_type, config).value
    }

    /// Settles the location, applies the event's impact, re-settles, and
    /// records the event id. Mirrors the original calling
    /// `calculate_tension` both before and after applying the delta.
    pub fn update_tension_from_event(
        &self,
        key: &LocationKey,
        location_type: &str,
        event: &TensionEvent,
        config: &TensionConfig,
    ) -> f64 {
        self.settle(key, location_type, config);

        let delta = calculate_event_impact(event, config);
        let loc_config = config.location_config_for(location_type);
        let mut state = self.state_repo.get(key).expect("settle always persists state");
        state.value = (state.value + delta).clamp(loc_config.min_tension, loc_config.max_tension);
        state.record_event(event.id.clone());
        state.last_updated = self.clock.now();
        self.state_repo.save(state.clone());

        self.stats.increment_tension_updates();
        let settled = self.settle(key, location_type, config);
        settled.value
    }

    /// Adds a time-bounded modifier to a location's tension. At most one
    /// modifier per `modifier_type` is active at a time; a new modifier of
    /// the same type replaces whatever was previously in that slot.
    pub fn add_tension_modifier(
        &self,
        key: &LocationKey,
        location_type: &str,
        modifier_type: impl Into<String>,
        source: impl Into<String>,
        value: f64,
        duration_hours: f64,
        config: &TensionConfig,
    ) {
        self.settle(key, location_type, config);
        let mut state = self.state_repo.get(key).expect("settle always persists state");
        let now = self.clock.now();
        let modifier_type = modifier_type.into();
        state.modifiers.retain(|m| m.modifier_type != modifier_type);
        state.modifiers.push(TensionModifier::new(
            Uuid::new_v4().to_string(),
            modifier_type,
            source,
            value,
            now,
            duration_hours,
        ));
        self.state_repo.save(state);
    }

    /// Returns every location whose current (already-settled) tension falls
    /// within `[min_value, max_value]`. Does not re-settle — callers that
    /// need fresh values should decay first.
    pub fn get_regions_by_tension(&self, min_value: f64, max_value: f64) -> Vec<TensionState> {
        self.state_repo
            .all()
            .into_iter()
            .filter(|s| s.value >= min_value && s.value <= max_value)
            .collect()
    }

    /// Settles every tracked location against the current clock, applying
    /// decay and sweeping expired modifiers globally.
    pub fn decay_all_tension(&self, location_type_for: impl Fn(&LocationKey) -> String, config: &TensionConfig) {
        for state in self.state_repo.all() {
            let location_type = location_type_for(&state.location);
            self.settle(&state.location, &location_type, config);
        }
        self.stats.record_global_update(self.clock.now());
    }
}
