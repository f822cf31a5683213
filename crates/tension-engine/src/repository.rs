//! Repository and service port traits the engine depends on, plus an
//! in-memory reference implementation of each. Mirrors the teacher's
//! `FactionRegistry` (a `HashMap`-backed store behind a narrow API) adapted
//! for explicit injection instead of an ECS resource.

use std::collections::HashMap;
use std::sync::RwLock;

use tension_types::{FactionRelationship, FactionSnapshot, LocationKey, TensionState};

use crate::error::{EngineError, FactionServiceError};

/// Storage for environmental tension state, keyed by location.
pub trait TensionStateRepository: Send + Sync {
    fn get(&self, key: &LocationKey) -> Option<TensionState>;
    fn save(&self, state: TensionState);
    fn all(&self) -> Vec<TensionState>;
}

/// Storage for faction-to-faction relationships, keyed by the canonical
/// faction id pair.
pub trait FactionRelationshipRepository: Send + Sync {
    fn get(&self, faction_a_id: &str, faction_b_id: &str) -> Option<FactionRelationship>;
    fn save(&self, relationship: FactionRelationship);
    fn for_faction(&self, faction_id: &str) -> Vec<FactionRelationship>;
    fn all(&self) -> Vec<FactionRelationship>;
}

/// Read-only view into faction identity and hidden attributes, supplied by
/// whatever subsystem owns faction data. The engine never mutates factions;
/// it only reads snapshots to compute power scores.
pub trait FactionService: Send + Sync {
    fn get_faction(&self, faction_id: &str) -> Result<FactionSnapshot, FactionServiceError>;
}

/// In-memory `TensionStateRepository`, sharded behind a single `RwLock` as
/// described in the concurrency model: each call takes the lock only for
/// the duration of the map access, never across a full engine operation.
#[derive(Debug, Default)]
pub struct InMemoryTensionStateRepository {
    states: RwLock<HashMap<LocationKey, TensionState>>,
}

impl InMemoryTensionStateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TensionStateRepository for InMemoryTensionStateRepository {
    fn get(&self, key: &LocationKey) -> Option<TensionState> {
        self.states
            .read()
            .expect("tension state lock poisoned")
            .get(key)
            .cloned()
    }

    fn save(&self, state: TensionState) {
        self.states
            .write()
            .expect("tension state lock poisoned")
            .insert(state.location.clone(), state);
    }

    fn all(&self) -> Vec<TensionState> {
        self.states
            .read()
            .expect("tension state lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

/// In-memory `FactionRelationshipRepository`, keyed by the canonical pair.
#[derive(Debug, Default)]
pub struct InMemoryFactionRelationshipRepository {
    relationships: RwLock<HashMap<(String, String), FactionRelationship>>,
}

impl InMemoryFactionRelationshipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FactionRelationshipRepository for InMemoryFactionRelationshipRepository {
    fn get(&self, faction_a_id: &str, faction_b_id: &str) -> Option<FactionRelationship> {
        let pair = tension_types::canonical_pair(faction_a_id, faction_b_id);
        self.relationships
            .read()
            .expect("faction relationship lock poisoned")
            .get(&pair)
            .cloned()
    }

    fn save(&self, relationship: FactionRelationship) {
        let pair = (
            relationship.faction_a_id.clone(),
            relationship.faction_b_id.clone(),
        );
        self.relationships
            .write()
            .expect("faction relationship lock poisoned")
            .insert(pair, relationship);
    }

    fn for_faction(&self, faction_id: &str) -> Vec<FactionRelationship> {
        self.relationships
            .read()
            .expect("faction relationship lock poisoned")
            .values()
            .filter(|r| r.involves(faction_id))
            .cloned()
            .collect()
    }

    fn all(&self) -> Vec<FactionRelationship> {
        self.relationships
            .read()
            .expect("faction relationship lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

/// A `FactionService` backed by an in-memory map of snapshots, useful for
/// tests and the CLI scenario runner.
#[derive(Debug, Default)]
pub struct StaticFactionService {
    factions: HashMap<String, FactionSnapshot>,
}

impl StaticFactionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_faction(mut self, snapshot: FactionSnapshot) -> Self {
        self.factions.insert(snapshot.id.clone(), snapshot);
        self
    }
}

impl FactionService for StaticFactionService {
    fn get_faction(&self, faction_id: &str) -> Result<FactionSnapshot, FactionServiceError> {
        self.factions
            .get(faction_id)
            .cloned()
            .ok_or_else(|| FactionServiceError::NotFound(faction_id.to_string()))
    }
}

/// Converts a faction-service lookup failure into an engine-level error at
/// call sites that treat a missing faction as "not evaluable" rather than a
/// hard failure. Named so call sites read as intentional policy, not an
/// oversight.
pub fn faction_lookup_or_skip(
    result: Result<FactionSnapshot, FactionServiceError>,
) -> Result<Option<FactionSnapshot>, EngineError> {
    match result {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(FactionServiceError::NotFound(_)) => Ok(None),
        Err(e) => Err(EngineError::FactionService(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tension_types::{HiddenAttributes, Timestamp};

    #[test]
    fn state_repository_round_trips() {
        let repo = InMemoryTensionStateRepository::new();
        let key = LocationKey::region("r1");
        assert!(repo.get(&key).is_none());
        repo.save(TensionState::new(key.clone(), 0.2, Timestamp::from_secs(0)));
        assert_eq!(repo.get(&key).unwrap().value, 0.2);
        assert_eq!(repo.all().len(), 1);
    }

    #[test]
    fn relationship_repository_is_commutative() {
        let repo = InMemoryFactionRelationshipRepository::new();
        repo.save(FactionRelationship::new("beta", "alpha", Timestamp::from_secs(0)));
        assert!(repo.get("alpha", "beta").is_some());
        assert!(repo.get("beta", "alpha").is_some());
        assert_eq!(repo.for_faction("alpha").len(), 1);
    }

    #[test]
    fn static_faction_service_reports_not_found() {
        let service = StaticFactionService::new().with_faction(FactionSnapshot {
            id: "alpha".to_string(),
            power_level: 1.0,
            member_count: 10,
            hidden_attributes: HiddenAttributes::default(),
        });
        assert!(service.get_faction("alpha").is_ok());
        assert!(matches!(
            service.get_faction("missing"),
            Err(FactionServiceError::NotFound(_))
        ));
    }
}
