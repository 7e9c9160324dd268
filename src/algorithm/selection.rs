use rand::{Rng, SeedableRng, rngs::StdRng};
use std::fmt;

use crate::algorithm::bitset::TileBitset;
use crate::catalog::index::TileRef;
use crate::io::error::{Result, invalid_parameter};

/// Number of directional votes a candidate needs, from 1 (any) to 4 (all)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Strictness(u8);

impl Strictness {
    /// Loosest tier: one matching side suffices
    pub const MIN: Self = Self(1);
    /// Strictest tier: every side must agree
    pub const MAX: Self = Self(4);

    /// Validate a strictness value
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `value` is within 1..=4
    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(invalid_parameter(
                "strictness",
                &value,
                &"must be between 1 and 4",
            ))
        }
    }

    /// Raw tier value
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The next looser tier, if any
    pub const fn relaxed(self) -> Option<Self> {
        if self.0 > Self::MIN.0 {
            Some(Self(self.0 - 1))
        } else {
            None
        }
    }

    /// Tiers from strictest down to `self`
    pub fn tiers_down_to(self) -> impl Iterator<Item = Self> {
        (self.0..=Self::MAX.0).rev().map(Self)
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Multi-directional vote over neighbor candidate sets
///
/// Keeps its tally buffer between votes to avoid per-cell allocation.
#[derive(Clone, Debug)]
pub struct ConstraintVoter {
    universe: usize,
    tally: Vec<u8>,
}

impl ConstraintVoter {
    /// Create a voter for a catalog of `universe` tiles
    pub fn new(universe: usize) -> Self {
        Self {
            universe,
            tally: vec![0; universe],
        }
    }

    /// Number of tiles in the catalog
    pub const fn universe(&self) -> usize {
        self.universe
    }

    /// Accept the tiles voted for by enough sides
    ///
    /// Absent sets are unconstrained directions; each one lowers the bar by
    /// one. A tile must still appear in at least one present set, except when
    /// all four sides are unconstrained, in which case every catalog tile is
    /// accepted.
    pub fn select(
        &mut self,
        sets: &[Option<&TileBitset>; 4],
        strictness: Strictness,
    ) -> TileBitset {
        let unconstrained = sets.iter().filter(|set| set.is_none()).count();
        if unconstrained == sets.len() {
            return TileBitset::all(self.universe);
        }

        self.tally.clear();
        self.tally.resize(self.universe, 0);

        for set in sets.iter().flatten() {
            for tile in set.iter() {
                if let Some(count) = self.tally.get_mut(tile as usize - 1) {
                    *count += 1;
                }
            }
        }

        let threshold = (strictness.get() as usize)
            .saturating_sub(unconstrained)
            .max(1);

        let mut accepted = TileBitset::new(self.universe);
        for (index, &count) in self.tally.iter().enumerate() {
            if count as usize >= threshold {
                accepted.insert((index + 1) as TileRef);
            }
        }
        accepted
    }
}

/// Free-function form of [`ConstraintVoter::select`]
pub fn select_candidates(
    sets: &[Option<&TileBitset>; 4],
    strictness: Strictness,
    universe: usize,
) -> TileBitset {
    ConstraintVoter::new(universe).select(sets, strictness)
}

/// Seeded random selector for reproducible stochastic choices
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Wrap an existing generator
    pub const fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Uniformly choose one member of a set
    pub fn choose(&mut self, candidates: &TileBitset) -> Option<TileRef> {
        let count = candidates.count();
        if count == 0 {
            return None;
        }
        let pick = self.rng.random_range(0..count);
        candidates.nth(pick)
    }
}
