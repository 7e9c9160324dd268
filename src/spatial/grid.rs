//! Grid state, positions and rectangular regions
//!
//! The grid holds the authoritative tile references plus a transient hover
//! overlay used only for previews. Arrays are indexed `[row, col]`, i.e.
//! `[y, x]`; positions are signed so that neighbor offsets can leave the map
//! and be rejected later.

use ndarray::Array2;
use std::fmt;

use crate::catalog::index::{EMPTY_TILE, TileRef};
use crate::spatial::direction::Direction;

/// Signed cell position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Coord {
    /// Create a position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent position in a direction
    ///
    /// Saturates at the `i32` limits, which always lie outside any grid.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The position shifted one step if a direction is given
    #[must_use]
    pub const fn step_opt(self, direction: Option<Direction>) -> Self {
        match direction {
            Some(direction) => self.step(direction),
            None => self,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Corners of a region in calibration priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Minimum x, minimum y
    TopLeft,
    /// Maximum x, minimum y
    TopRight,
    /// Maximum x, maximum y
    BottomRight,
    /// Minimum x, maximum y
    BottomLeft,
}

impl Corner {
    /// All corners in priority order
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];
}

/// Axis-aligned rectangle of cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Minimum coordinates (inclusive)
    pub min: Coord,
    /// Maximum coordinates (inclusive)
    pub max: Coord,
}

impl Region {
    /// Region covering a whole `width` x `height` map
    pub const fn full(width: usize, height: usize) -> Self {
        Self {
            min: Coord::new(0, 0),
            max: Coord::new(width as i32 - 1, height as i32 - 1),
        }
    }

    /// Square of side `2 * radius + 1` around `center`, clipped to the map
    pub fn around(center: Coord, radius: usize, width: usize, height: usize) -> Self {
        let radius = radius.min(i32::MAX as usize / 2) as i32;
        Self {
            min: Coord::new(
                center.x.saturating_sub(radius).max(0),
                center.y.saturating_sub(radius).max(0),
            ),
            max: Coord::new(
                center.x.saturating_add(radius).min(width as i32 - 1),
                center.y.saturating_add(radius).min(height as i32 - 1),
            ),
        }
    }

    /// Check if a position is within the region
    pub const fn contains(&self, pos: Coord) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Whether the region holds no cells
    pub const fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max.x - self.min.x + 1) as usize
        }
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max.y - self.min.y + 1) as usize
        }
    }

    /// Position of a corner
    pub const fn corner(&self, corner: Corner) -> Coord {
        match corner {
            Corner::TopLeft => Coord::new(self.min.x, self.min.y),
            Corner::TopRight => Coord::new(self.max.x, self.min.y),
            Corner::BottomRight => Coord::new(self.max.x, self.max.y),
            Corner::BottomLeft => Coord::new(self.min.x, self.max.y),
        }
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> Vec<Coord> {
        self.scan_from(Corner::TopLeft)
    }

    /// Every cell row by row, rows and columns advancing away from `corner`
    pub fn scan_from(&self, corner: Corner) -> Vec<Coord> {
        if self.is_empty() {
            return Vec::new();
        }

        let xs: Vec<i32> = match corner {
            Corner::TopLeft | Corner::BottomLeft => (self.min.x..=self.max.x).collect(),
            Corner::TopRight | Corner::BottomRight => (self.min.x..=self.max.x).rev().collect(),
        };
        let ys: Vec<i32> = match corner {
            Corner::TopLeft | Corner::TopRight => (self.min.y..=self.max.y).collect(),
            Corner::BottomLeft | Corner::BottomRight => (self.min.y..=self.max.y).rev().collect(),
        };

        let mut cells = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                cells.push(Coord::new(x, y));
            }
        }
        cells
    }
}

/// Tile grid with a transient hover overlay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Authoritative tile references (`EMPTY_TILE` = no tile)
    cells: Array2<TileRef>,
    /// Preview references drawn over `cells`; never part of constraints
    hover: Array2<Option<TileRef>>,
}

impl Grid {
    /// Create an EMPTY grid of `width` x `height` cells
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Array2::from_elem((height, width), EMPTY_TILE),
            hover: Array2::from_elem((height, width), None),
        }
    }

    /// Wrap an existing cell array shaped `(height, width)`
    pub fn from_cells(cells: Array2<TileRef>) -> Self {
        let hover = Array2::from_elem(cells.dim(), None);
        Self { cells, hover }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.dim().1
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.dim().0
    }

    /// Dimensions as `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Region covering the whole grid
    pub fn bounds(&self) -> Region {
        Region::full(self.width(), self.height())
    }

    /// Array index of a position, if in bounds
    pub fn index_of(&self, pos: Coord) -> Option<[usize; 2]> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        (x < self.width() && y < self.height()).then_some([y, x])
    }

    /// Check if a position is within the grid
    pub fn contains(&self, pos: Coord) -> bool {
        self.index_of(pos).is_some()
    }

    /// Tile at a position
    pub fn get(&self, pos: Coord) -> Option<TileRef> {
        self.index_of(pos)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Whether the position is in bounds and holds no tile
    pub fn is_empty_at(&self, pos: Coord) -> bool {
        self.get(pos) == Some(EMPTY_TILE)
    }

    /// Overwrite a cell, returning the previous tile
    ///
    /// Bypasses the action log; editing goes through the session gateway.
    pub fn write(&mut self, pos: Coord, tile: TileRef) -> Option<TileRef> {
        let index = self.index_of(pos)?;
        self.cells
            .get_mut(index)
            .map(|cell| std::mem::replace(cell, tile))
    }

    /// Whether no cell holds a tile
    pub fn is_all_empty(&self) -> bool {
        self.cells.iter().all(|&tile| tile == EMPTY_TILE)
    }

    /// Number of EMPTY cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&tile| tile == EMPTY_TILE).count()
    }

    /// Number of EMPTY cells inside a region
    pub fn empty_count_in(&self, region: &Region) -> usize {
        region
            .cells()
            .into_iter()
            .filter(|&pos| self.is_empty_at(pos))
            .count()
    }

    /// Read-only view of the cells
    pub const fn cells(&self) -> &Array2<TileRef> {
        &self.cells
    }

    /// Tile to display: the hover preview if any, else the cell
    pub fn display_tile(&self, pos: Coord) -> Option<TileRef> {
        let index = self.index_of(pos)?;
        self.hover
            .get(index)
            .copied()
            .flatten()
            .or_else(|| self.cells.get(index).copied())
    }

    /// Set a hover preview; returns false if out of bounds
    pub fn set_hover(&mut self, pos: Coord, tile: Option<TileRef>) -> bool {
        let Some(index) = self.index_of(pos) else {
            return false;
        };
        if let Some(slot) = self.hover.get_mut(index) {
            *slot = tile;
        }
        true
    }

    /// Hover preview at a position
    pub fn hover(&self, pos: Coord) -> Option<TileRef> {
        self.index_of(pos)
            .and_then(|index| self.hover.get(index).copied().flatten())
    }

    /// Drop every hover preview
    pub fn clear_hover(&mut self) {
        self.hover.fill(None);
    }

    /// Resize keeping top-left anchored content
    ///
    /// New cells are EMPTY and the hover overlay is reset. Returns the tiles
    /// that fell outside the new bounds.
    pub fn resize(&mut self, width: usize, height: usize) -> Vec<(Coord, TileRef)> {
        let mut cropped = Vec::new();
        for ((row, col), &tile) in self.cells.indexed_iter() {
            if tile != EMPTY_TILE && (col >= width || row >= height) {
                cropped.push((Coord::new(col as i32, row as i32), tile));
            }
        }

        let mut cells = Array2::from_elem((height, width), EMPTY_TILE);
        for ((row, col), &tile) in self.cells.indexed_iter() {
            if let Some(cell) = cells.get_mut([row, col]) {
                *cell = tile;
            }
        }

        self.cells = cells;
        self.hover = Array2::from_elem((height, width), None);
        cropped
    }
}

/// Editing cursor, always inside the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    position: Coord,
}

impl Cursor {
    /// Cursor at the top-left cell
    pub const fn new() -> Self {
        Self {
            position: Coord::new(0, 0),
        }
    }

    /// Current position
    pub const fn position(&self) -> Coord {
        self.position
    }

    /// Move to a position, clamped to a `width` x `height` grid
    pub fn set(&mut self, pos: Coord, width: usize, height: usize) {
        let max_x = (width as i32 - 1).max(0);
        let max_y = (height as i32 - 1).max(0);
        self.position = Coord::new(pos.x.clamp(0, max_x), pos.y.clamp(0, max_y));
    }

    /// Move one step, clamped
    pub fn step(&mut self, direction: Direction, width: usize, height: usize) {
        self.set(self.position.step(direction), width, height);
    }

    /// Re-clamp after a resize
    pub fn clamp(&mut self, width: usize, height: usize) {
        self.set(self.position, width, height);
    }
}
