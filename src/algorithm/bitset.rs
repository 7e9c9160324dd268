use bitvec::prelude::*;
use std::fmt;

use crate::catalog::index::TileRef;

/// Fixed-size bitset of tile references
///
/// Uses 1-based indexing to match tile references throughout the system;
/// reference 0 is the EMPTY tile and can never be a member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileBitset {
    bits: BitVec,
    max_tiles: usize,
}

impl TileBitset {
    /// Create a bitset with no tiles present
    pub fn new(max_tiles: usize) -> Self {
        Self {
            bits: bitvec![0; max_tiles],
            max_tiles,
        }
    }

    /// Create a bitset containing every tile of the catalog
    pub fn all(max_tiles: usize) -> Self {
        Self {
            bits: bitvec![1; max_tiles],
            max_tiles,
        }
    }

    /// Build a bitset from tile references, ignoring out-of-range ones
    pub fn from_refs<I>(refs: I, max_tiles: usize) -> Self
    where
        I: IntoIterator<Item = TileRef>,
    {
        let mut bitset = Self::new(max_tiles);
        for tile in refs {
            bitset.insert(tile);
        }
        bitset
    }

    /// Number of tiles the set can address
    pub const fn capacity(&self) -> usize {
        self.max_tiles
    }

    /// Insert a tile reference
    ///
    /// Takes 1-based references, storing at index-1 internally
    pub fn insert(&mut self, tile: TileRef) {
        let tile = tile as usize;
        if tile > 0 && tile <= self.max_tiles {
            self.bits.set(tile - 1, true);
        }
    }

    /// Test tile membership
    pub fn contains(&self, tile: TileRef) -> bool {
        let tile = tile as usize;
        if tile > 0 {
            self.bits.get(tile - 1).as_deref() == Some(&true)
        } else {
            false
        }
    }

    /// Intersect this bitset with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Add every member of another bitset in-place
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Test if no tiles are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count tiles in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Members in ascending reference order
    pub fn iter(&self) -> impl Iterator<Item = TileRef> + '_ {
        self.bits.iter_ones().map(|index| (index + 1) as TileRef)
    }

    /// The `n`-th member in ascending order
    pub fn nth(&self, n: usize) -> Option<TileRef> {
        self.iter().nth(n)
    }

    /// Extract all tile references as a vector
    pub fn to_vec(&self) -> Vec<TileRef> {
        self.iter().collect()
    }
}

impl fmt::Display for TileBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileBitset({} tiles: {:?})", self.count(), self.to_vec())
    }
}
