//! Observability snapshots: running engine counters, faction power
//! attributes, and system health.

use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};

/// Running counters maintained by the engine across its lifetime, exposed
/// read-only by the coordinator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineStats {
    pub total_tension_updates: u64,
    pub total_faction_updates: u64,
    pub conflicts_triggered: u64,
    pub wars_triggered: u64,
    pub alliances_formed: u64,
    pub revolts_triggered: u64,
    pub modifiers_expired: u64,
    pub last_global_update: Option<Timestamp>,
    pub last_modifier_cleanup: Option<Timestamp>,
}

/// The six hidden attributes that feed `calculate_faction_power_score`.
/// Any attribute not supplied defaults to `5.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HiddenAttributes {
    pub ambition: f64,
    pub discipline: f64,
    pub pragmatism: f64,
    pub resilience: f64,
    pub integrity: f64,
    pub impulsivity: f64,
}

impl Default for HiddenAttributes {
    fn default() -> Self {
        Self {
            ambition: 5.0,
            discipline: 5.0,
            pragmatism: 5.0,
            resilience: 5.0,
            integrity: 5.0,
            impulsivity: 5.0,
        }
    }
}

/// A read-only view of a faction as seen by the tension engine, supplied by
/// the `FactionService` port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionSnapshot {
    pub id: String,
    pub power_level: f64,
    pub member_count: u32,
    pub hidden_attributes: HiddenAttributes,
}

/// Coordinator-level summary of which optional collaborators are wired up,
/// plus current engine counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemHealth {
    pub faction_service_connected: bool,
    pub event_bus_connected: bool,
    pub stats: EngineStats,
}
