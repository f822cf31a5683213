//! Tension-relevant event taxonomy.

use crate::clock::Timestamp;
use crate::location::LocationKey;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of event categories the engine knows how to score by
/// name. Parsing is closed to these variants plus `Other(_)` for anything
/// else — an unrecognized string never fails to parse, it just falls back
/// to a named catch-all, which is itself still a valid key into the event
/// impact configuration table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    PlayerCombat,
    PlayerDeath,
    NpcDeath,
    NpcArrival,
    EnvironmentalDisaster,
    MagicalEvent,
    EconomicChange,
    EconomicCrisis,
    MarketCrash,
    PoliticalChange,
    Festival,
    RevoltOccurred,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::PlayerCombat => "player_combat",
            EventKind::PlayerDeath => "player_death",
            EventKind::NpcDeath => "npc_death",
            EventKind::NpcArrival => "npc_arrival",
            EventKind::EnvironmentalDisaster => "environmental_disaster",
            EventKind::MagicalEvent => "magical_event",
            EventKind::EconomicChange => "economic_change",
            EventKind::EconomicCrisis => "economic_crisis",
            EventKind::MarketCrash => "market_crash",
            EventKind::PoliticalChange => "political_change",
            EventKind::Festival => "festival",
            EventKind::RevoltOccurred => "revolt_occurred",
            EventKind::Other(s) => s.as_str(),
        }
    }
}

impl FromStr for EventKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "player_combat" => EventKind::PlayerCombat,
            "player_death" => EventKind::PlayerDeath,
            "npc_death" => EventKind::NpcDeath,
            "npc_arrival" => EventKind::NpcArrival,
            "environmental_disaster" => EventKind::EnvironmentalDisaster,
            "magical_event" => EventKind::MagicalEvent,
            "economic_change" => EventKind::EconomicChange,
            "economic_crisis" => EventKind::EconomicCrisis,
            "market_crash" => EventKind::MarketCrash,
            "political_change" => EventKind::PoliticalChange,
            "festival" => EventKind::Festival,
            "revolt_occurred" => EventKind::RevoltOccurred,
            other => EventKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EventKind::from_str(&s).map_err(|_| D::Error::custom("unreachable"))
    }
}

/// Parameters describing how an event happened, consulted by the event
/// impact calculator's per-type modifier logic (lethal, stealth,
/// important, civilian, severity, success level, regime change, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventParameters {
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    #[serde(default)]
    pub numbers: HashMap<String, f64>,
}

impl EventParameters {
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn number(&self, name: &str, default: f64) -> f64 {
        *self.numbers.get(name).unwrap_or(&default)
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    pub fn with_number(mut self, name: impl Into<String>, value: f64) -> Self {
        self.numbers.insert(name.into(), value);
        self
    }
}

/// A single tension-relevant occurrence fed into `update_tension_from_event`
/// or the faction relationship engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensionEvent {
    pub id: String,
    pub kind: EventKind,
    pub location: Option<LocationKey>,
    pub faction_ids: Vec<String>,
    pub at: Timestamp,
    pub parameters: EventParameters,
}

impl TensionEvent {
    pub fn new(id: impl Into<String>, kind: EventKind, at: Timestamp) -> Self {
        Self {
            id: id.into(),
            kind,
            location: None,
            faction_ids: Vec::new(),
            at,
            parameters: EventParameters::default(),
        }
    }

    pub fn at_location(mut self, location: LocationKey) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_factions(mut self, faction_ids: Vec<String>) -> Self {
        self.faction_ids = faction_ids;
        self
    }

    pub fn with_parameters(mut self, parameters: EventParameters) -> Self {
        self.parameters = parameters;
        self
    }
}
