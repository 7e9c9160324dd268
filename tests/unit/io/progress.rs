//! Tests for ingestion progress display

#[cfg(test)]
mod tests {
    use std::path::Path;
    use tileweave::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
    use tileweave::io::progress::ProgressManager;

    // Tests the per-map lifecycle on a small batch
    // Verified by dropping announced maps
    #[test]
    fn test_small_batch() {
        let mut pm = ProgressManager::new();
        pm.initialize(2);

        pm.start_map(0, Path::new("maps/a.png"));
        pm.complete_map(0, 4);
        pm.start_map(1, Path::new("maps/b.png"));
        pm.skip_map(1);

        assert_eq!(pm.tracked_maps(), 2);
        pm.finish();
    }

    // Tests large batches keep tracking past the visible window
    // Verified by capping tracked maps at the bar count
    #[test]
    fn test_large_batch() {
        let mut pm = ProgressManager::default();
        let count = MAX_INDIVIDUAL_PROGRESS_BARS * 3;
        pm.initialize(count);

        for index in 0..count {
            pm.start_map(index, Path::new(&format!("map_{index}.png")));
            pm.complete_map(index, index);
        }

        assert_eq!(pm.tracked_maps(), count);
        pm.finish();
    }

    // Tests out-of-order announcements grow the tracked list
    // Verified by indexing without resizing
    #[test]
    fn test_sparse_start() {
        let mut pm = ProgressManager::new();
        pm.initialize(1);
        pm.start_map(3, Path::new("late.png"));
        assert_eq!(pm.tracked_maps(), 4);
        pm.complete_map(9, 1);
        assert_eq!(pm.tracked_maps(), 4);
    }

    // Tests fill bars count placed cells
    // Verified by sizing the bar from the label
    #[test]
    fn test_fill_bar() {
        let pm = ProgressManager::new();
        let bar = pm.fill_bar(12, "generating");
        bar.inc(5);
        assert_eq!(bar.length(), Some(12));
        assert_eq!(bar.position(), 5);
        bar.finish_and_clear();
    }
}
