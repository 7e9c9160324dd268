//! Editing session: the context every grid operation runs against
//!
//! Owns the interned catalog, the grid, the cursor, the action log and the
//! seeded random source. All cell mutations go through
//! [`EditorSession::set_tile`], which is also where history is recorded.

use ndarray::Array2;
use tracing::{debug, instrument, trace};

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::calibration;
use crate::algorithm::propagation::{FillReport, FillRun};
use crate::algorithm::selection::{ConstraintVoter, RandomSelector, Strictness};
use crate::catalog::identity::TileIdentity;
use crate::catalog::index::{EMPTY_TILE, TileIndex, TileRef};
use crate::editor::history::{ActionLog, ActionLogEntry};
use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{EngineError, Result, invalid_parameter};
use crate::io::exchange::GridExchange;
use crate::spatial::direction::Direction;
use crate::spatial::grid::{Coord, Cursor, Grid};
use crate::spatial::neighbors::candidate_sets;

fn validate_dimensions(width: usize, height: usize) -> Result<()> {
    for (parameter, value) in [("width", width), ("height", height)] {
        if value == 0 || value > MAX_GRID_DIMENSION {
            return Err(invalid_parameter(
                parameter,
                &value,
                &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
            ));
        }
    }
    Ok(())
}

fn grid_from_exchange(index: &TileIndex, exchange: &GridExchange) -> Result<Grid> {
    let (width, height) = exchange.dimensions()?;
    validate_dimensions(width, height)?;

    let mut cells = Array2::from_elem((height, width), EMPTY_TILE);
    for (row, identities) in exchange.cells.iter().enumerate() {
        for (col, identity) in identities.iter().enumerate() {
            if let Some(cell) = cells.get_mut([row, col]) {
                *cell = index.resolve(identity)?;
            }
        }
    }
    Ok(Grid::from_cells(cells))
}

/// Direction in which an action log entry is applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Replay {
    Backward,
    Forward,
}

/// Explicit session context for editing and generation
#[derive(Clone, Debug)]
pub struct EditorSession {
    index: TileIndex,
    grid: Grid,
    cursor: Cursor,
    history: ActionLog,
    voter: ConstraintVoter,
    selector: RandomSelector,
}

impl EditorSession {
    /// Start a session on an EMPTY `width` x `height` map
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a dimension is zero or exceeds
    /// `MAX_GRID_DIMENSION`
    pub fn new(index: TileIndex, width: usize, height: usize, seed: u64) -> Result<Self> {
        Self::with_selector(index, width, height, RandomSelector::new(seed))
    }

    /// Start a session with a caller-supplied random source
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a dimension is zero or exceeds
    /// `MAX_GRID_DIMENSION`
    pub fn with_selector(
        index: TileIndex,
        width: usize,
        height: usize,
        selector: RandomSelector,
    ) -> Result<Self> {
        validate_dimensions(width, height)?;
        let voter = ConstraintVoter::new(index.len());
        Ok(Self {
            index,
            grid: Grid::new(width, height),
            cursor: Cursor::new(),
            history: ActionLog::new(),
            voter,
            selector,
        })
    }

    /// Start a session on a previously exported map
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` for ragged rows, `InvalidParameter` for
    /// unusable dimensions and `UnknownTile` for identities outside the
    /// catalog
    pub fn from_exchange(index: TileIndex, exchange: &GridExchange, seed: u64) -> Result<Self> {
        Self::from_exchange_with_selector(index, exchange, RandomSelector::new(seed))
    }

    /// Start a session on a previously exported map with a caller-supplied
    /// random source
    ///
    /// # Errors
    ///
    /// As [`EditorSession::from_exchange`]
    pub fn from_exchange_with_selector(
        index: TileIndex,
        exchange: &GridExchange,
        selector: RandomSelector,
    ) -> Result<Self> {
        let grid = grid_from_exchange(&index, exchange)?;
        let voter = ConstraintVoter::new(index.len());
        Ok(Self {
            index,
            grid,
            cursor: Cursor::new(),
            history: ActionLog::new(),
            voter,
            selector,
        })
    }

    /// Replace the map with an EMPTY one and start a fresh history
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for unusable dimensions
    pub fn new_map(&mut self, width: usize, height: usize) -> Result<()> {
        validate_dimensions(width, height)?;
        self.grid = Grid::new(width, height);
        self.cursor.clamp(width, height);
        self.history.clear();
        Ok(())
    }

    /// Replace the map with an imported one and start a fresh history
    ///
    /// # Errors
    ///
    /// Same as [`EditorSession::from_exchange`]; the current map is kept on
    /// failure
    pub fn load_map(&mut self, exchange: &GridExchange) -> Result<()> {
        let grid = grid_from_exchange(&self.index, exchange)?;
        self.cursor.clamp(grid.width(), grid.height());
        self.grid = grid;
        self.history.clear();
        Ok(())
    }

    /// The interned catalog
    pub const fn index(&self) -> &TileIndex {
        &self.index
    }

    /// The current grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The action log
    pub const fn history(&self) -> &ActionLog {
        &self.history
    }

    /// The cursor position
    pub const fn cursor(&self) -> Coord {
        self.cursor.position()
    }

    /// Tile at a position
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the position is outside the map
    pub fn tile(&self, pos: Coord) -> Result<TileRef> {
        self.grid.get(pos).ok_or(EngineError::OutOfBounds {
            position: pos,
            dimensions: self.grid.dimensions(),
        })
    }

    /// Identity at a position
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the position is outside the map
    pub fn identity_at(&self, pos: Coord) -> Result<TileIdentity> {
        let tile = self.tile(pos)?;
        self.index
            .identity(tile)
            .ok_or_else(|| EngineError::UnknownTile {
                tile: tile.to_string(),
            })
    }

    /// The single mutation gateway
    ///
    /// Writes `tile` at `pos`, shifted one cell when `direction` is given.
    /// Returns whether the cell changed; writing the tile a cell already holds
    /// is a no-op and is never logged.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` for a target outside the map and `UnknownTile`
    /// for a reference outside the catalog
    pub fn set_tile(
        &mut self,
        pos: Coord,
        tile: TileRef,
        direction: Option<Direction>,
        should_log: bool,
    ) -> Result<bool> {
        let target = pos.step_opt(direction);
        let old = self.tile(target)?;

        if !self.index.is_valid(tile) {
            return Err(EngineError::UnknownTile {
                tile: tile.to_string(),
            });
        }
        if old == tile {
            return Ok(false);
        }

        self.grid.write(target, tile);
        if should_log {
            self.history.record(ActionLogEntry::TileChange {
                position: target,
                old,
                new: tile,
            });
        }
        trace!(x = target.x, y = target.y, old, new = tile, "cell updated");

        Ok(true)
    }

    /// [`EditorSession::set_tile`] for an identity
    ///
    /// # Errors
    ///
    /// Returns `UnknownTile` for an identity outside the catalog, otherwise as
    /// [`EditorSession::set_tile`]
    pub fn set_tile_identity(
        &mut self,
        pos: Coord,
        identity: &TileIdentity,
        direction: Option<Direction>,
        should_log: bool,
    ) -> Result<bool> {
        let tile = self.index.resolve(identity)?;
        self.set_tile(pos, tile, direction, should_log)
    }

    /// Place a tile at the cursor, or next to it
    ///
    /// # Errors
    ///
    /// As [`EditorSession::set_tile`]
    pub fn place_at_cursor(&mut self, tile: TileRef, direction: Option<Direction>) -> Result<bool> {
        self.set_tile(self.cursor.position(), tile, direction, true)
    }

    /// Move the cursor, clamped to the map
    pub fn set_cursor(&mut self, pos: Coord) {
        let (width, height) = self.grid.dimensions();
        self.cursor.set(pos, width, height);
    }

    /// Move the cursor one cell, clamped to the map
    pub fn move_cursor(&mut self, direction: Direction) {
        let (width, height) = self.grid.dimensions();
        self.cursor.step(direction, width, height);
    }

    /// Show a preview tile without touching the map
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if the position is outside the map
    pub fn set_hover(&mut self, pos: Coord, tile: TileRef) -> Result<()> {
        if self.grid.set_hover(pos, Some(tile)) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds {
                position: pos,
                dimensions: self.grid.dimensions(),
            })
        }
    }

    /// Drop every preview
    pub fn clear_hover(&mut self) {
        self.grid.clear_hover();
    }

    /// Resize the map, keeping top-left anchored content
    ///
    /// Tiles that fall outside are cleared through logged changes before the
    /// resize itself is logged, so undo restores them.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for unusable dimensions
    #[instrument(skip(self))]
    pub fn resize_map(&mut self, width: usize, height: usize) -> Result<()> {
        validate_dimensions(width, height)?;
        let old = self.grid.dimensions();
        if old == (width, height) {
            return Ok(());
        }

        let cropped: Vec<Coord> = self
            .grid
            .bounds()
            .cells()
            .into_iter()
            .filter(|pos| {
                (pos.x as usize >= width || pos.y as usize >= height)
                    && !self.grid.is_empty_at(*pos)
            })
            .collect();
        for pos in cropped {
            self.set_tile(pos, EMPTY_TILE, None, true)?;
        }

        self.grid.resize(width, height);
        self.cursor.clamp(width, height);
        self.history.record(ActionLogEntry::Resize {
            old,
            new: (width, height),
        });
        debug!(?old, new = ?(width, height), "map resized");

        Ok(())
    }

    fn replay(&mut self, entry: ActionLogEntry, replay: Replay) {
        match entry {
            ActionLogEntry::TileChange { position, old, new } => {
                let tile = match replay {
                    Replay::Backward => old,
                    Replay::Forward => new,
                };
                self.grid.write(position, tile);
            }
            ActionLogEntry::Resize { old, new } => {
                let (width, height) = match replay {
                    Replay::Backward => old,
                    Replay::Forward => new,
                };
                self.grid.resize(width, height);
                self.cursor.clamp(width, height);
            }
        }
        self.grid.clear_hover();
    }

    /// Revert the last applied entry; false (with a warning) if none
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo() else {
            return false;
        };
        self.replay(entry, Replay::Backward);
        true
    }

    /// Reapply the next undone entry; false (with a warning) if none
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo() else {
            return false;
        };
        self.replay(entry, Replay::Forward);
        true
    }

    /// Tiles the voter accepts at a position
    pub fn candidates(&mut self, pos: Coord, strictness: Strictness) -> TileBitset {
        let sets = candidate_sets(&self.index, &self.grid, pos);
        self.voter.select(&sets, strictness)
    }

    /// Randomly choose an accepted tile for a position
    ///
    /// # Errors
    ///
    /// Returns `NoCandidate` when the voter accepts nothing
    pub fn choose_tile(&mut self, pos: Coord, strictness: Strictness) -> Result<TileRef> {
        let accepted = self.candidates(pos, strictness);
        self.selector
            .choose(&accepted)
            .ok_or(EngineError::NoCandidate {
                position: pos,
                strictness: strictness.get(),
            })
    }

    /// Uniformly random catalog tile
    pub fn random_tile(&mut self) -> Option<TileRef> {
        self.selector.choose(&self.index.universe())
    }

    /// Prepare a fill run for step-wise (animated) driving
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `origin` is outside the map
    pub fn fill_run(&self, origin: Coord, minimum_strictness: Strictness) -> Result<FillRun> {
        FillRun::new(&self.grid, origin, minimum_strictness)
    }

    /// Fill the map outward from `origin`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `origin` is outside the map
    #[instrument(skip(self), fields(width = self.grid.width(), height = self.grid.height()))]
    pub fn fill(&mut self, origin: Coord, minimum_strictness: Strictness) -> Result<FillReport> {
        self.fill_run(origin, minimum_strictness)?.run(self)
    }

    /// Clear and refill the square of `radius` around `origin`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `origin` is outside the map and
    /// `NoValidCalibrationStart` if no corner of the region admits a fill
    pub fn calibrate(
        &mut self,
        origin: Coord,
        minimum_strictness: Strictness,
        radius: usize,
    ) -> Result<FillReport> {
        calibration::calibrate(self, origin, minimum_strictness, radius)
    }

    /// Export the map as identities
    pub fn to_exchange(&self) -> GridExchange {
        let cells = self
            .grid
            .cells()
            .outer_iter()
            .map(|row| {
                row.iter()
                    .map(|&tile| {
                        self.index
                            .identity(tile)
                            .unwrap_or_else(TileIdentity::empty)
                    })
                    .collect()
            })
            .collect();
        GridExchange::new(cells)
    }
}
