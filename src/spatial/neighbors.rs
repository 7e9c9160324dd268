//! Neighbor lookups feeding the constraint voter
//!
//! A neighbor constrains a cell through the set it has observed on the side
//! facing the cell: the tile north of a cell contributes its `south` set.

use crate::algorithm::bitset::TileBitset;
use crate::catalog::index::{EMPTY_TILE, TileIndex, TileRef};
use crate::spatial::direction::Direction;
use crate::spatial::grid::{Coord, Grid};

/// Tile at a position, optionally shifted one step
///
/// Returns `None` when the resulting position is out of bounds.
pub fn tile_at(grid: &Grid, pos: Coord, direction: Option<Direction>) -> Option<TileRef> {
    grid.get(pos.step_opt(direction))
}

/// Candidate set imposed on `pos` by its neighbor in `direction`
///
/// `None` means the direction is unconstrained: the neighbor is out of
/// bounds or EMPTY.
pub fn neighbor_candidates<'a>(
    index: &'a TileIndex,
    grid: &Grid,
    pos: Coord,
    direction: Direction,
) -> Option<&'a TileBitset> {
    let neighbor = tile_at(grid, pos, Some(direction))?;
    if neighbor == EMPTY_TILE {
        return None;
    }
    index.neighbors(neighbor, direction.opposite())
}

/// Candidate sets for all four sides in [`Direction::ALL`] order
pub fn candidate_sets<'a>(
    index: &'a TileIndex,
    grid: &Grid,
    pos: Coord,
) -> [Option<&'a TileBitset>; 4] {
    Direction::ALL.map(|direction| neighbor_candidates(index, grid, pos, direction))
}
