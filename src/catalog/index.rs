//! Dense numbering of catalog identities for the generation engine
//!
//! The engine works on `TileRef`s: `0` is EMPTY and `1..=n` follow the
//! catalog's sorted identity order. Directional neighbor sets become
//! `TileBitset`s so votes can be tallied without string comparisons.

use std::collections::HashMap;

use crate::algorithm::bitset::TileBitset;
use crate::catalog::identity::TileIdentity;
use crate::catalog::record::TileCatalog;
use crate::io::error::{EngineError, Result};
use crate::spatial::direction::Direction;

/// Reference to a catalog tile (1-based) or EMPTY (0)
pub type TileRef = u32;

/// The EMPTY tile reference
pub const EMPTY_TILE: TileRef = 0;

/// Interned, read-only view of a [`TileCatalog`]
#[derive(Clone, Debug)]
pub struct TileIndex {
    identities: Vec<TileIdentity>,
    groups: Vec<String>,
    lookup: HashMap<TileIdentity, TileRef>,
    /// Per tile (index = ref - 1), neighbor sets in [`Direction::ALL`] order
    neighbors: Vec<[TileBitset; 4]>,
}

impl TileIndex {
    /// Intern a catalog
    ///
    /// # Errors
    ///
    /// Returns `DanglingReference` if a directional set names an identity
    /// without its own record
    pub fn from_catalog(catalog: &TileCatalog) -> Result<Self> {
        let tile_count = catalog.len();

        let identities: Vec<TileIdentity> = catalog.identities().cloned().collect();
        let lookup: HashMap<TileIdentity, TileRef> = identities
            .iter()
            .enumerate()
            .map(|(index, identity)| (identity.clone(), (index + 1) as TileRef))
            .collect();

        let mut groups = Vec::with_capacity(tile_count);
        let mut neighbors = Vec::with_capacity(tile_count);

        for (identity, record) in catalog.iter() {
            let mut sets = [
                TileBitset::new(tile_count),
                TileBitset::new(tile_count),
                TileBitset::new(tile_count),
                TileBitset::new(tile_count),
            ];

            for direction in Direction::ALL {
                for neighbor in record.neighbors(direction) {
                    let Some(&tile) = lookup.get(neighbor) else {
                        return Err(EngineError::DanglingReference {
                            identity: neighbor.clone(),
                            context: format!("the {direction} set of '{identity}'"),
                        });
                    };
                    if let Some(set) = sets.get_mut(direction.index()) {
                        set.insert(tile);
                    }
                }
            }

            groups.push(record.group.clone());
            neighbors.push(sets);
        }

        Ok(Self {
            identities,
            groups,
            lookup,
            neighbors,
        })
    }

    /// Number of catalog tiles
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Whether a reference is EMPTY or names a catalog tile
    pub fn is_valid(&self, tile: TileRef) -> bool {
        (tile as usize) <= self.len()
    }

    /// Identity of a reference; EMPTY maps to the EMPTY sentinel
    pub fn identity(&self, tile: TileRef) -> Option<TileIdentity> {
        if tile == EMPTY_TILE {
            return Some(TileIdentity::empty());
        }
        self.identities.get(tile as usize - 1).cloned()
    }

    /// Reference of a catalog identity
    pub fn lookup(&self, identity: &TileIdentity) -> Option<TileRef> {
        self.lookup.get(identity).copied()
    }

    /// Resolve an identity arriving from outside the engine
    ///
    /// EMPTY and CURSOR both resolve to [`EMPTY_TILE`]; the cursor is a UI
    /// marker, not a grid occupant.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTile` for an identity the catalog does not contain
    pub fn resolve(&self, identity: &TileIdentity) -> Result<TileRef> {
        if identity.is_reserved() {
            return Ok(EMPTY_TILE);
        }
        self.lookup(identity).ok_or_else(|| EngineError::UnknownTile {
            tile: identity.to_string(),
        })
    }

    /// Group label of a tile
    pub fn group(&self, tile: TileRef) -> Option<&str> {
        if tile == EMPTY_TILE {
            return None;
        }
        self.groups.get(tile as usize - 1).map(String::as_str)
    }

    /// Identities the tile has observed on its `direction` side
    pub fn neighbors(&self, tile: TileRef, direction: Direction) -> Option<&TileBitset> {
        if tile == EMPTY_TILE {
            return None;
        }
        self.neighbors
            .get(tile as usize - 1)
            .and_then(|sets| sets.get(direction.index()))
    }

    /// Every catalog tile
    pub fn universe(&self) -> TileBitset {
        TileBitset::all(self.len())
    }
}
