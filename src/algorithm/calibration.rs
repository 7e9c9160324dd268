use tracing::{debug, info, instrument};

use crate::algorithm::propagation::{FillReport, FillRun};
use crate::algorithm::selection::Strictness;
use crate::catalog::index::{EMPTY_TILE, TileRef};
use crate::editor::session::EditorSession;
use crate::io::error::{EngineError, Result};
use crate::spatial::grid::{Coord, Corner, Region};

/// Pick the first corner of `region` that accepts a tile once the region is
/// cleared
///
/// The clearing is a trial: the region is restored before returning and
/// nothing is logged.
///
/// # Errors
///
/// Propagates session errors raised while clearing or restoring
pub fn choose_calibration_corner(
    session: &mut EditorSession,
    region: &Region,
    minimum_strictness: Strictness,
) -> Result<Option<Corner>> {
    let snapshot: Vec<(Coord, TileRef)> = region
        .cells()
        .into_iter()
        .map(|pos| session.tile(pos).map(|tile| (pos, tile)))
        .collect::<Result<_>>()?;

    for &(pos, _) in &snapshot {
        session.set_tile(pos, EMPTY_TILE, None, false)?;
    }

    let mut chosen = None;
    for corner in Corner::ALL {
        let pos = region.corner(corner);
        if !session.candidates(pos, minimum_strictness).is_empty() {
            chosen = Some(corner);
            break;
        }
    }

    for &(pos, tile) in &snapshot {
        session.set_tile(pos, tile, None, false)?;
    }

    debug!(?chosen, "calibration corner search finished");
    Ok(chosen)
}

/// Clear the square of `radius` around `origin` and refill it from the first
/// usable corner
///
/// # Errors
///
/// Returns `OutOfBounds` if `origin` is outside the grid and
/// `NoValidCalibrationStart` when no corner accepts a tile; the grid and
/// the log are untouched in both cases
#[instrument(skip(session))]
pub fn calibrate(
    session: &mut EditorSession,
    origin: Coord,
    minimum_strictness: Strictness,
    radius: usize,
) -> Result<FillReport> {
    let (width, height) = session.grid().dimensions();
    if !session.grid().contains(origin) {
        return Err(EngineError::OutOfBounds {
            position: origin,
            dimensions: (width, height),
        });
    }

    let region = Region::around(origin, radius, width, height);
    let Some(corner) = choose_calibration_corner(session, &region, minimum_strictness)? else {
        return Err(EngineError::NoValidCalibrationStart { origin, radius });
    };

    let scan = region.scan_from(corner);
    for &pos in &scan {
        session.set_tile(pos, EMPTY_TILE, None, true)?;
    }

    let report = FillRun::for_region(region, scan, minimum_strictness).run(session)?;
    info!(
        ?corner,
        cells = region.width() * region.height(),
        placed = report.placed,
        "calibration complete"
    );
    Ok(report)
}
