//! Progress display for map ingestion and paced fills

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Outcome shown next to a map once it has been handled
#[derive(Clone, Debug, PartialEq, Eq)]
enum MapStatus {
    Pending,
    Ingested(usize),
    Skipped,
}

static MAP_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Maps: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

static FILL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {pos}/{len} cells")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress display for a batch of source maps
///
/// Shows one line per map for small batches and a rolling window of the
/// most recent maps under a single batch bar for large ones.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    map_bars: Vec<ProgressBar>,
    map_states: Vec<(String, MapStatus)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            map_bars: Vec::new(),
            map_states: Vec::new(),
        }
    }

    /// Prepare bars for `map_count` maps
    pub fn initialize(&mut self, map_count: usize) {
        if map_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(map_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..map_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new_spinner();
            bar.set_style(MAP_STYLE.clone());
            self.map_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Number of maps announced so far
    pub fn tracked_maps(&self) -> usize {
        self.map_states.len()
    }

    /// Announce a map about to be ingested
    pub fn start_map(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.map_states.len() {
            self.map_states
                .resize(index + 1, (String::new(), MapStatus::Pending));
        }
        if let Some(state) = self.map_states.get_mut(index) {
            *state = (display_name, MapStatus::Pending);
        }
        self.update_bars();
    }

    /// Mark a map as ingested with the number of tiles it introduced
    pub fn complete_map(&mut self, index: usize, new_tiles: usize) {
        self.settle(index, MapStatus::Ingested(new_tiles));
    }

    /// Mark a map as skipped
    pub fn skip_map(&mut self, index: usize) {
        self.settle(index, MapStatus::Skipped);
    }

    fn settle(&mut self, index: usize, status: MapStatus) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.map_states.get_mut(index) {
            state.1 = status;
        }
        self.update_bars();
    }

    /// Bar counting filled cells of a paced fill
    pub fn fill_bar(&self, total_cells: usize, label: &str) -> ProgressBar {
        let bar = ProgressBar::new(total_cells as u64);
        bar.set_style(FILL_STYLE.clone());
        bar.set_message(label.to_string());
        self.multi_progress.add(bar)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All maps processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Show the last N announced maps
    fn update_bars(&self) {
        let start = self
            .map_states
            .len()
            .saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = self.map_states.get(start..).unwrap_or(&[]);

        for (bar_idx, (name, status)) in visible.iter().enumerate() {
            if let Some(bar) = self.map_bars.get(bar_idx) {
                let message = match status {
                    MapStatus::Pending => "ingesting...".to_string(),
                    MapStatus::Ingested(new_tiles) => format!("✓ {new_tiles} new tiles"),
                    MapStatus::Skipped => "skipped".to_string(),
                };
                bar.set_prefix(name.clone());
                bar.set_message(message);
            }
        }

        for bar_idx in visible.len()..self.map_bars.len() {
            if let Some(bar) = self.map_bars.get(bar_idx) {
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }
}
