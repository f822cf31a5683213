//! Location identity for the tension model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the geography a tension value is attached to: a region, or a
/// specific point of interest within a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    pub region_id: String,
    pub poi_id: Option<String>,
}

impl LocationKey {
    pub fn region(region_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            poi_id: None,
        }
    }

    pub fn poi(region_id: impl Into<String>, poi_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            poi_id: Some(poi_id.into()),
        }
    }

    pub fn is_region_level(&self) -> bool {
        self.poi_id.is_none()
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.poi_id {
            Some(poi) => write!(f, "{}:{}", self.region_id, poi),
            None => write!(f, "{}", self.region_id),
        }
    }
}

/// The coarse category a point of interest belongs to, used to look up a
/// default [`crate::config::LocationConfig`] when no region-specific override
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    City,
    Town,
    Village,
    Dungeon,
    Ruins,
    Camp,
    Tower,
    Temple,
    Mine,
    Fortress,
}
