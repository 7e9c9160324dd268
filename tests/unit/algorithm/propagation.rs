//! Tests for the fill queue and the resumable fill state machine

#[cfg(test)]
mod tests {
    use crate::fixtures::{CatalogFixture, checkerboard, uniform};
    use tileweave::algorithm::propagation::{FillPhase, FillQueue, FillRun};
    use tileweave::algorithm::selection::Strictness;
    use tileweave::catalog::identity::TileIdentity;
    use tileweave::catalog::index::EMPTY_TILE;
    use tileweave::io::error::EngineError;
    use tileweave::spatial::direction::Direction;
    use tileweave::spatial::grid::{Coord, Region};

    fn strictness(value: u8) -> Strictness {
        Strictness::new(value).unwrap()
    }

    // Tests the queue hands positions back in insertion order
    // Verified by popping from the back
    #[test]
    fn test_fill_queue_fifo() {
        let mut queue: FillQueue = [Coord::new(0, 0), Coord::new(1, 0)].into_iter().collect();
        queue.push(Coord::new(2, 0));
        queue.push(Coord::new(0, 0));

        assert_eq!(queue.len(), 4);
        assert_eq!(queue.pop(), Some(Coord::new(0, 0)));
        assert_eq!(queue.pop(), Some(Coord::new(1, 0)));
        assert_eq!(queue.pop(), Some(Coord::new(2, 0)));
        assert_eq!(queue.pop(), Some(Coord::new(0, 0)));
        assert!(queue.is_empty());
    }

    // Tests an origin outside the grid is rejected rather than clamped
    // Verified by clamping the origin into bounds
    #[test]
    fn test_origin_out_of_bounds() {
        let session = uniform(&["a"]).session(3, 3, 1);
        let result = session.fill_run(Coord::new(3, 0), Strictness::MAX);
        assert!(matches!(result, Err(EngineError::OutOfBounds { .. })));
    }

    // Tests a self-compatible tile fills every cell
    // Verified by not enqueueing neighbors after a placement
    #[test]
    fn test_uniform_fill_covers_grid() {
        let mut session = uniform(&["a"]).session(4, 3, 9);
        let report = session.fill(Coord::new(1, 1), strictness(2)).unwrap();

        assert_eq!(report.placed, 12);
        assert_eq!(report.seeded, 1);
        assert_eq!(report.propagated, 11);
        assert_eq!(report.supplemental, 0);
        assert_eq!(report.remaining_empty, 0);
        assert!(session.grid().cells().iter().all(|&tile| tile == 1));
    }

    // Tests placements respect the observed adjacency
    // Verified by voting with every side unconstrained
    #[test]
    fn test_checkerboard_alternates() {
        let mut session = checkerboard().session(5, 5, 4);
        session.fill(Coord::new(2, 2), Strictness::MAX).unwrap();

        let grid = session.grid();
        for pos in grid.bounds().cells() {
            let tile = grid.get(pos).unwrap();
            assert_ne!(tile, EMPTY_TILE);
            for direction in Direction::ALL {
                if let Some(neighbor) = grid.get(pos.step(direction)) {
                    assert_ne!(tile, neighbor, "{pos} matches its {direction} neighbor");
                }
            }
        }
    }

    // Tests the first step seeds the origin of an empty grid
    // Verified by skipping the seeding phase
    #[test]
    fn test_first_step_seeds_origin() {
        let mut session = uniform(&["a", "b"]).session(3, 3, 5);
        let mut run = session.fill_run(Coord::new(2, 1), Strictness::MAX).unwrap();

        let step = run.step(&mut session).unwrap().unwrap();
        assert_eq!(step.position, Coord::new(2, 1));
        assert_eq!(step.phase, FillPhase::Seeding);
        assert_eq!(run.phase(), FillPhase::Propagating);
    }

    // Tests seeding only happens on an entirely empty grid
    // Verified by seeding whenever the origin is empty
    #[test]
    fn test_no_seed_when_prefilled() {
        let mut session = uniform(&["a"]).session(3, 3, 5);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("a"), None, true)
            .unwrap();

        let report = session.fill(Coord::new(2, 2), Strictness::MAX).unwrap();
        assert_eq!(report.seeded, 0);
        assert_eq!(report.placed, 8);
    }

    // Tests a neighbor with an empty facing set keeps the cell empty
    // Verified by treating empty sets as unconstrained
    #[test]
    fn test_blocked_cell_stays_empty() {
        let mut session = CatalogFixture::new().tile("a").session(2, 1, 3);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("a"), None, true)
            .unwrap();

        let report = session.fill(Coord::new(0, 0), Strictness::MIN).unwrap();
        assert_eq!(report.placed, 0);
        assert_eq!(report.remaining_empty, 1);
        assert_eq!(session.tile(Coord::new(1, 0)).unwrap(), EMPTY_TILE);
        assert_eq!(session.history().len(), 1);
    }

    // Tests an empty facing set from the only neighbor accepts nothing
    // Verified by a two-tile catalog where the placed tile has no east links
    #[test]
    fn test_empty_facing_set_blocks_at_full_strictness() {
        let mut session = CatalogFixture::new()
            .link("b", Direction::North, "a")
            .session(2, 1, 3);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("a"), None, true)
            .unwrap();

        assert!(session.candidates(Coord::new(1, 0), Strictness::MAX).is_empty());

        let report = session.fill(Coord::new(0, 0), Strictness::MAX).unwrap();
        assert_eq!(report.placed, 0);
        assert_eq!(session.tile(Coord::new(1, 0)).unwrap(), EMPTY_TILE);
    }

    // Tests relaxed tiers fill what full strictness could not
    // Verified by stopping after the strictest supplemental pass
    #[test]
    fn test_supplemental_tier_fills_disagreement() {
        let fixture = CatalogFixture::new()
            .link("a", Direction::East, "b")
            .link("c", Direction::West, "d");
        let mut session = fixture.session(3, 1, 8);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("a"), None, true)
            .unwrap();
        session
            .set_tile_identity(Coord::new(2, 0), &TileIdentity::new("c"), None, true)
            .unwrap();

        let mut run = session.fill_run(Coord::new(1, 0), strictness(2)).unwrap();
        let step = run.step(&mut session).unwrap().unwrap();
        assert_eq!(step.position, Coord::new(1, 0));
        assert_eq!(step.phase, FillPhase::Supplemental(strictness(3)));

        let placed = session.identity_at(Coord::new(1, 0)).unwrap();
        assert!(placed == TileIdentity::new("b") || placed == TileIdentity::new("d"));

        assert!(run.step(&mut session).unwrap().is_none());
        assert!(run.is_done());
        assert_eq!(run.report().supplemental, 1);
    }

    // Tests the minimum strictness bounds the supplemental passes
    // Verified by always relaxing down to strictness 1
    #[test]
    fn test_minimum_strictness_respected() {
        let fixture = CatalogFixture::new()
            .link("a", Direction::East, "b")
            .link("c", Direction::West, "d");
        let mut session = fixture.session(3, 1, 8);
        session
            .set_tile_identity(Coord::new(0, 0), &TileIdentity::new("a"), None, true)
            .unwrap();
        session
            .set_tile_identity(Coord::new(2, 0), &TileIdentity::new("c"), None, true)
            .unwrap();

        let report = session.fill(Coord::new(1, 0), Strictness::MAX).unwrap();
        assert_eq!(report.placed, 0);
        assert_eq!(report.remaining_empty, 1);
    }

    // Tests stepping a run reproduces the synchronous fill for the same seed
    // Verified by drawing the seed tile from a separate random source
    #[test]
    fn test_stepwise_matches_run() {
        let fixture = || uniform(&["a", "b", "c"]).link("a", Direction::North, "a");
        let origin = Coord::new(3, 2);

        let mut synchronous = fixture().session(6, 5, 21);
        synchronous.fill(origin, strictness(2)).unwrap();

        let mut stepped = fixture().session(6, 5, 21);
        let mut run = stepped.fill_run(origin, strictness(2)).unwrap();
        let mut steps = 0;
        while run.step(&mut stepped).unwrap().is_some() {
            steps += 1;
        }

        assert_eq!(stepped.grid(), synchronous.grid());
        assert_eq!(stepped.history().entries(), synchronous.history().entries());
        assert_eq!(steps, run.report().placed);
    }

    // Tests dropping a run between steps leaves exactly the applied mutations
    // Verified by recording the whole run upfront
    #[test]
    fn test_cancellation_between_steps() {
        let mut session = uniform(&["a", "b"]).session(4, 4, 2);
        let mut run = session.fill_run(Coord::new(0, 0), strictness(2)).unwrap();
        for _ in 0..3 {
            run.step(&mut session).unwrap();
        }
        drop(run);

        assert_eq!(session.history().len(), 3);
        assert_eq!(session.grid().empty_count(), 13);
        while session.undo() {}
        assert!(session.grid().is_all_empty());
    }

    // Tests a region run never touches cells outside its scope
    // Verified by enqueueing neighbors without the scope check
    #[test]
    fn test_region_run_confined() {
        let mut session = uniform(&["a"]).session(5, 5, 6);
        let region = Region::around(Coord::new(2, 2), 1, 5, 5);

        let report = FillRun::for_region(region, region.cells(), Strictness::MAX)
            .run(&mut session)
            .unwrap();

        assert_eq!(report.placed, 9);
        assert_eq!(report.seeded, 0);
        for pos in session.grid().bounds().cells() {
            assert_eq!(session.grid().is_empty_at(pos), !region.contains(pos));
        }
    }

    // Tests fills drop hover previews
    // Verified by removing the hover reset from the idle phase
    #[test]
    fn test_fill_clears_hover() {
        let mut session = uniform(&["a"]).session(2, 2, 1);
        session.set_hover(Coord::new(1, 1), 1).unwrap();
        session.fill(Coord::new(0, 0), Strictness::MAX).unwrap();
        assert_eq!(session.grid().hover(Coord::new(1, 1)), None);
    }
}
