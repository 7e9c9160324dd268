//! Tests for calibration corner search and region refill

#[cfg(test)]
mod tests {
    use crate::fixtures::{CatalogFixture, uniform};
    use tileweave::algorithm::calibration::{calibrate, choose_calibration_corner};
    use tileweave::algorithm::selection::Strictness;
    use tileweave::catalog::identity::TileIdentity;
    use tileweave::catalog::index::EMPTY_TILE;
    use tileweave::io::error::EngineError;
    use tileweave::spatial::grid::{Coord, Corner, Region};

    // Tests the top-left corner wins when every corner is usable
    // Verified by reversing the corner priority order
    #[test]
    fn test_top_left_preferred() {
        let mut session = uniform(&["a", "b"]).session(5, 5, 3);
        session.fill(Coord::new(2, 2), Strictness::MAX).unwrap();
        let before = session.grid().clone();
        let logged = session.history().len();

        let region = Region::around(Coord::new(2, 2), 1, 5, 5);
        let corner = choose_calibration_corner(&mut session, &region, Strictness::MAX).unwrap();

        assert_eq!(corner, Some(Corner::TopLeft));
        assert_eq!(session.grid(), &before);
        assert_eq!(session.history().len(), logged);
    }

    // Tests a blocked corner is skipped for the next one in priority order
    // Verified by testing corners against the uncleared region
    #[test]
    fn test_blocked_corner_skipped() {
        let mut session = CatalogFixture::new()
            .tile("x")
            .link_all("y", "y")
            .session(4, 1, 3);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("x"), None, true)
            .unwrap();

        let region = Region::around(Coord::new(2, 0), 1, 4, 1);
        let corner = choose_calibration_corner(&mut session, &region, Strictness::MIN).unwrap();
        assert_eq!(corner, Some(Corner::TopRight));

        // The cell next to x keeps one vote from its filled east side
        let report = calibrate(&mut session, Coord::new(2, 0), Strictness::MIN, 1).unwrap();
        assert_eq!(report.remaining_empty, 0);
        for x in 1..4 {
            assert_eq!(
                session.identity_at(Coord::new(x, 0)).unwrap(),
                TileIdentity::new("y")
            );
        }
        assert_eq!(
            session.identity_at(Coord::new(0, 0)).unwrap(),
            TileIdentity::new("x")
        );
    }

    // Tests full strictness leaves the cell beside a disagreeing tile empty
    // Verified by relaxing the tier during the refill
    #[test]
    fn test_blocked_cell_at_full_strictness() {
        let mut session = CatalogFixture::new()
            .tile("x")
            .link_all("y", "y")
            .session(4, 1, 3);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("x"), None, true)
            .unwrap();

        let report = calibrate(&mut session, Coord::new(2, 0), Strictness::MAX, 1).unwrap();
        assert_eq!(report.remaining_empty, 1);
        assert_eq!(session.tile(Coord::new(1, 0)).unwrap(), EMPTY_TILE);
        assert_eq!(
            session.identity_at(Coord::new(3, 0)).unwrap(),
            TileIdentity::new("y")
        );
    }

    // Tests calibration refills the region and logs both the clear and the refill
    // Verified by clearing the region without logging
    #[test]
    fn test_calibrate_refills_region() {
        let mut session = uniform(&["a"]).session(5, 5, 12);
        session.fill(Coord::new(0, 0), Strictness::MAX).unwrap();
        assert_eq!(session.history().len(), 25);

        let report = session
            .calibrate(Coord::new(2, 2), Strictness::MAX, 1)
            .unwrap();

        assert_eq!(report.placed, 9);
        assert_eq!(report.remaining_empty, 0);
        assert_eq!(session.history().len(), 25 + 9 + 9);
        assert!(session.grid().cells().iter().all(|&tile| tile == 1));
    }

    // Tests the region is clipped at the map edge
    // Verified by letting the region extend past the bounds
    #[test]
    fn test_calibrate_clips_region() {
        let mut session = uniform(&["a"]).session(5, 5, 12);
        session.fill(Coord::new(0, 0), Strictness::MAX).unwrap();

        let report = session
            .calibrate(Coord::new(0, 0), Strictness::MAX, 2)
            .unwrap();
        assert_eq!(report.placed, 9);
    }

    // Tests no usable corner is reported and leaves grid and log untouched
    // Verified by clearing the region before the corner search succeeds
    #[test]
    fn test_no_valid_start() {
        let mut session = CatalogFixture::new().tile("a").session(3, 1, 1);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("a"), None, true)
            .unwrap();
        let before = session.grid().clone();

        let result = session.calibrate(Coord::new(1, 0), Strictness::MIN, 0);
        match result {
            Err(EngineError::NoValidCalibrationStart { origin, radius }) => {
                assert_eq!(origin, Coord::new(1, 0));
                assert_eq!(radius, 0);
            }
            other => panic!("expected NoValidCalibrationStart, got {other:?}"),
        }
        assert_eq!(session.grid(), &before);
        assert_eq!(session.history().len(), 1);
    }

    // Tests an empty catalog never offers a calibration start
    // Verified by returning the first corner unconditionally
    #[test]
    fn test_empty_catalog_has_no_start() {
        let mut session = CatalogFixture::new().session(3, 3, 1);
        let result = session.calibrate(Coord::new(1, 1), Strictness::MIN, 1);
        assert!(matches!(
            result,
            Err(EngineError::NoValidCalibrationStart { .. })
        ));
    }

    // Tests an origin outside the map is rejected
    // Verified by clamping the origin
    #[test]
    fn test_calibrate_out_of_bounds() {
        let mut session = uniform(&["a"]).session(3, 3, 1);
        let result = session.calibrate(Coord::new(-1, 1), Strictness::MIN, 1);
        assert!(matches!(result, Err(EngineError::OutOfBounds { .. })));
    }
}
