use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, info, trace};

use crate::algorithm::selection::Strictness;
use crate::catalog::index::TileRef;
use crate::editor::session::EditorSession;
use crate::io::error::{EngineError, Result};
use crate::spatial::direction::Direction;
use crate::spatial::grid::{Coord, Grid, Region};

/// FIFO of positions awaiting a fill attempt
///
/// Duplicates and out-of-scope entries are tolerated; they are discarded
/// when dequeued.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillQueue {
    positions: VecDeque<Coord>,
}

impl FillQueue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            positions: VecDeque::new(),
        }
    }

    /// Enqueue at the back
    pub fn push(&mut self, pos: Coord) {
        self.positions.push_back(pos);
    }

    /// Dequeue from the front
    pub fn pop(&mut self) -> Option<Coord> {
        self.positions.pop_front()
    }

    /// Number of queued positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Extend<Coord> for FillQueue {
    fn extend<I: IntoIterator<Item = Coord>>(&mut self, iter: I) {
        self.positions.extend(iter);
    }
}

impl FromIterator<Coord> for FillQueue {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Stage of a fill run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillPhase {
    /// Not started
    Idle,
    /// Placing a random tile at the origin of an EMPTY grid
    Seeding,
    /// Breadth-first fill at full strictness
    Propagating,
    /// Relaxed sweep over the remaining EMPTY cells
    Supplemental(Strictness),
    /// Nothing left to do
    Done,
}

impl fmt::Display for FillPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Seeding => write!(f, "seeding"),
            Self::Propagating => write!(f, "propagating"),
            Self::Supplemental(tier) => write!(f, "supplemental (strictness {tier})"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// One cell mutation performed by [`FillRun::step`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillStep {
    /// Filled cell
    pub position: Coord,
    /// Placed tile
    pub tile: TileRef,
    /// Phase that placed it
    pub phase: FillPhase,
}

/// Counters of a fill run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Cells filled in total
    pub placed: usize,
    /// Cells filled by seeding (0 or 1)
    pub seeded: usize,
    /// Cells filled while propagating
    pub propagated: usize,
    /// Cells filled by the supplemental passes
    pub supplemental: usize,
    /// EMPTY cells left in scope once the run is done
    pub remaining_empty: usize,
}

impl FillReport {
    fn record(&mut self, phase: FillPhase) {
        self.placed += 1;
        match phase {
            FillPhase::Seeding => self.seeded += 1,
            FillPhase::Propagating => self.propagated += 1,
            FillPhase::Supplemental(_) => self.supplemental += 1,
            FillPhase::Idle | FillPhase::Done => {}
        }
    }
}

/// Resumable fill over a grid or a region of it
///
/// Each call to [`FillRun::step`] performs at most one logged mutation, so a
/// run can be paced by a caller and dropped between steps.
#[derive(Clone, Debug)]
pub struct FillRun {
    phase: FillPhase,
    scope: Region,
    origin: Option<Coord>,
    queue: FillQueue,
    scan: Vec<Coord>,
    scan_position: usize,
    minimum_strictness: Strictness,
    report: FillReport,
}

impl FillRun {
    /// Whole-grid run seeded at `origin`
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `origin` is outside the grid
    pub fn new(grid: &Grid, origin: Coord, minimum_strictness: Strictness) -> Result<Self> {
        if !grid.contains(origin) {
            return Err(EngineError::OutOfBounds {
                position: origin,
                dimensions: grid.dimensions(),
            });
        }

        let scope = grid.bounds();
        let queue = std::iter::once(origin)
            .chain(Direction::ALL.map(|direction| origin.step(direction)))
            .collect();

        Ok(Self {
            phase: FillPhase::Idle,
            scope,
            origin: Some(origin),
            queue,
            scan: scope.cells(),
            scan_position: 0,
            minimum_strictness,
            report: FillReport::default(),
        })
    }

    /// Run confined to `region`, visiting cells in `scan` order
    ///
    /// Never seeds; `scan` is both the initial queue and the supplemental
    /// sweep order.
    pub fn for_region(region: Region, scan: Vec<Coord>, minimum_strictness: Strictness) -> Self {
        Self {
            phase: FillPhase::Idle,
            scope: region,
            origin: None,
            queue: scan.iter().copied().collect(),
            scan,
            scan_position: 0,
            minimum_strictness,
            report: FillReport::default(),
        }
    }

    /// Current phase
    pub const fn phase(&self) -> FillPhase {
        self.phase
    }

    /// Whether the run has finished
    pub const fn is_done(&self) -> bool {
        matches!(self.phase, FillPhase::Done)
    }

    /// Counters so far
    pub const fn report(&self) -> &FillReport {
        &self.report
    }

    /// Region the run may fill
    pub const fn scope(&self) -> Region {
        self.scope
    }

    fn enter(&mut self, phase: FillPhase, session: &EditorSession) {
        debug!(from = %self.phase, to = %phase, "fill phase transition");
        self.phase = phase;
        if phase == FillPhase::Done {
            self.report.remaining_empty = session.grid().empty_count_in(&self.scope);
        }
    }

    fn after_pass(&self, tier: Strictness) -> FillPhase {
        tier.relaxed()
            .filter(|next| *next >= self.minimum_strictness)
            .map_or(FillPhase::Done, FillPhase::Supplemental)
    }

    fn placed(&mut self, position: Coord, tile: TileRef) -> Option<FillStep> {
        self.report.record(self.phase);
        Some(FillStep {
            position,
            tile,
            phase: self.phase,
        })
    }

    /// Advance until one cell has been filled or the run is done
    ///
    /// # Errors
    ///
    /// Propagates non-recoverable session errors; a cell without candidates
    /// is left EMPTY and is not an error
    pub fn step(&mut self, session: &mut EditorSession) -> Result<Option<FillStep>> {
        loop {
            match self.phase {
                FillPhase::Idle => {
                    session.clear_hover();
                    let next = if self.origin.is_some() {
                        FillPhase::Seeding
                    } else {
                        FillPhase::Propagating
                    };
                    self.enter(next, session);
                }
                FillPhase::Seeding => {
                    let seed = self
                        .origin
                        .filter(|_| session.grid().is_all_empty())
                        .and_then(|origin| session.random_tile().map(|tile| (origin, tile)));

                    if let Some((origin, tile)) = seed
                        && session.set_tile(origin, tile, None, true)?
                    {
                        let step = self.placed(origin, tile);
                        self.enter(FillPhase::Propagating, session);
                        return Ok(step);
                    }
                    self.enter(FillPhase::Propagating, session);
                }
                FillPhase::Propagating => {
                    let Some(pos) = self.queue.pop() else {
                        self.scan_position = 0;
                        self.enter(FillPhase::Supplemental(Strictness::MAX), session);
                        continue;
                    };
                    if !self.scope.contains(pos) || !session.grid().is_empty_at(pos) {
                        continue;
                    }
                    if let Some(tile) = fill_cell(session, pos, Strictness::MAX)? {
                        for direction in Direction::ALL {
                            let neighbor = pos.step(direction);
                            if self.scope.contains(neighbor) && session.grid().is_empty_at(neighbor)
                            {
                                self.queue.push(neighbor);
                            }
                        }
                        return Ok(self.placed(pos, tile));
                    }
                }
                FillPhase::Supplemental(tier) => {
                    let Some(&pos) = self.scan.get(self.scan_position) else {
                        self.scan_position = 0;
                        let next = self.after_pass(tier);
                        self.enter(next, session);
                        continue;
                    };
                    self.scan_position += 1;
                    if !session.grid().is_empty_at(pos) {
                        continue;
                    }
                    if let Some(tile) = fill_cell(session, pos, tier)? {
                        return Ok(self.placed(pos, tile));
                    }
                }
                FillPhase::Done => return Ok(None),
            }
        }
    }

    /// Step until done
    ///
    /// # Errors
    ///
    /// As [`FillRun::step`]
    pub fn run(mut self, session: &mut EditorSession) -> Result<FillReport> {
        while self.step(session)?.is_some() {}

        info!(
            placed = self.report.placed,
            seeded = self.report.seeded,
            propagated = self.report.propagated,
            supplemental = self.report.supplemental,
            remaining_empty = self.report.remaining_empty,
            "fill complete"
        );
        Ok(self.report)
    }
}

/// Vote for a cell and place the chosen tile
///
/// Returns `None` when no candidate is accepted; the cell stays EMPTY.
pub fn fill_cell(
    session: &mut EditorSession,
    pos: Coord,
    strictness: Strictness,
) -> Result<Option<TileRef>> {
    match session.choose_tile(pos, strictness) {
        Ok(tile) => {
            session.set_tile(pos, tile, None, true)?;
            Ok(Some(tile))
        }
        Err(e) if e.is_recoverable() => {
            trace!(x = pos.x, y = pos.y, %strictness, "no candidate, cell left empty");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
