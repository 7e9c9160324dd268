//! Catalog records: group label, directional neighbor sets and provenance

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::identity::TileIdentity;
use crate::io::configuration::UNDEFINED_GROUP;
use crate::spatial::direction::Direction;

fn undefined_group() -> String {
    UNDEFINED_GROUP.to_string()
}

/// Everything the catalog knows about one tile identity
///
/// Directional sets hold identities observed adjacent in source maps; the
/// `south` set of a tile lists what was seen directly below it. Observations
/// are directional and never symmetrized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Classification label
    #[serde(default = "undefined_group")]
    pub group: String,
    /// Identities observed directly above
    #[serde(default)]
    pub north: BTreeSet<TileIdentity>,
    /// Identities observed directly to the right
    #[serde(default)]
    pub east: BTreeSet<TileIdentity>,
    /// Identities observed directly below
    #[serde(default)]
    pub south: BTreeSet<TileIdentity>,
    /// Identities observed directly to the left
    #[serde(default)]
    pub west: BTreeSet<TileIdentity>,
    /// Labels of the source maps the tile was seen in
    #[serde(default)]
    pub origins: BTreeSet<String>,
}

impl TileRecord {
    /// Create an unclassified record with no observations
    pub fn new() -> Self {
        Self {
            group: undefined_group(),
            ..Self::default()
        }
    }

    /// Neighbor set for a direction
    pub const fn neighbors(&self, direction: Direction) -> &BTreeSet<TileIdentity> {
        match direction {
            Direction::North => &self.north,
            Direction::East => &self.east,
            Direction::South => &self.south,
            Direction::West => &self.west,
        }
    }

    /// Mutable neighbor set for a direction
    pub const fn neighbors_mut(&mut self, direction: Direction) -> &mut BTreeSet<TileIdentity> {
        match direction {
            Direction::North => &mut self.north,
            Direction::East => &mut self.east,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
        }
    }
}

/// Identity-keyed catalog of tile records
///
/// Backed by a `BTreeMap` so iteration and serialization follow identity
/// order and are reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCatalog {
    records: BTreeMap<TileIdentity, TileRecord>,
}

impl TileCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already assembled records
    pub const fn from_records(records: BTreeMap<TileIdentity, TileRecord>) -> Self {
        Self { records }
    }

    /// Look up a record
    pub fn get(&self, identity: &TileIdentity) -> Option<&TileRecord> {
        self.records.get(identity)
    }

    /// Whether the catalog knows an identity
    pub fn contains(&self, identity: &TileIdentity) -> bool {
        self.records.contains_key(identity)
    }

    /// Number of distinct tiles
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no tiles
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in identity order
    pub fn iter(&self) -> impl Iterator<Item = (&TileIdentity, &TileRecord)> {
        self.records.iter()
    }

    /// Identities in sorted order
    pub fn identities(&self) -> impl Iterator<Item = &TileIdentity> {
        self.records.keys()
    }

    /// Number of tiles per group label
    pub fn group_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records.values() {
            *counts.entry(record.group.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
