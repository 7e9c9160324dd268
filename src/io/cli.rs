//! Command-line interface for catalog extraction, generation and calibration

use crate::algorithm::propagation::FillReport;
use crate::algorithm::selection::Strictness;
use crate::catalog::hashing::ContentHasher;
use crate::catalog::index::TileIndex;
use crate::catalog::ingestion::CatalogBuilder;
use crate::editor::session::EditorSession;
use crate::io::configuration::{
    DEFAULT_CALIBRATION_RADIUS, DEFAULT_FRAME_DELAY_MS, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH,
    DEFAULT_MIN_STRICTNESS, DEFAULT_SEED, DEFAULT_TILE_SIZE,
};
use crate::io::error::{EngineError, Result, invalid_parameter};
use crate::io::exchange::{read_catalog, read_grid, write_catalog, write_grid};
use crate::io::image::{TileAssets, export_grid_as_png, load_source_map};
use crate::io::progress::ProgressManager;
use crate::spatial::grid::Coord;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, trace, warn};

#[derive(Parser, Debug)]
#[command(name = "tileweave")]
#[command(
    author,
    version,
    about = "Build tile adjacency catalogs from maps and generate new maps from them"
)]
/// Command-line arguments for the tile catalog tool
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and all logs below errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest source maps into a tile catalog
    Extract(ExtractArgs),
    /// Fill a new or prefilled map from a catalog
    Generate(GenerateArgs),
    /// Clear and refill a square region of an existing map
    Calibrate(CalibrateArgs),
}

/// Arguments of `extract`
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source map PNG files
    #[arg(value_name = "MAPS", required = true)]
    pub maps: Vec<PathBuf>,

    /// Catalog JSON file to write
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Tile asset directory read for groups and extended with new tiles
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Tile edge length in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: usize,

    /// Abort on a malformed map instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Arguments of `generate`
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Catalog JSON file
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Map width in tiles
    #[arg(short = 'W', long, default_value_t = DEFAULT_MAP_WIDTH, conflicts_with = "prefill")]
    pub width: usize,

    /// Map height in tiles
    #[arg(short = 'H', long, default_value_t = DEFAULT_MAP_HEIGHT, conflicts_with = "prefill")]
    pub height: usize,

    /// Grid JSON file whose tiles are kept and built around
    #[arg(short, long)]
    pub prefill: Option<PathBuf>,

    /// Fill origin; defaults to the map center
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    pub origin: Option<Vec<i32>>,

    /// Lowest strictness tier of the supplemental passes
    #[arg(short, long, default_value_t = DEFAULT_MIN_STRICTNESS)]
    pub min_strictness: u8,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Place cells one at a time with a delay
    #[arg(long)]
    pub animate: bool,

    /// Delay between placements in animated mode
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_MS, requires = "animate")]
    pub frame_delay_ms: u64,

    /// Grid JSON file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Also compose the result into a PNG
    #[arg(long, requires = "assets")]
    pub png: Option<PathBuf>,

    /// Tile asset directory used for the PNG
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Tile edge length in pixels for the PNG
    #[arg(short, long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: usize,
}

/// Arguments of `calibrate`
#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Catalog JSON file
    #[arg(short, long)]
    pub catalog: PathBuf,

    /// Grid JSON file to calibrate
    #[arg(short, long)]
    pub grid: PathBuf,

    /// Center of the calibrated square
    #[arg(long, num_args = 2, value_names = ["X", "Y"], required = true, allow_negative_numbers = true)]
    pub origin: Vec<i32>,

    /// Half-width of the calibrated square
    #[arg(short, long, default_value_t = DEFAULT_CALIBRATION_RADIUS)]
    pub radius: usize,

    /// Lowest strictness tier accepted
    #[arg(short, long, default_value_t = DEFAULT_MIN_STRICTNESS)]
    pub min_strictness: u8,

    /// Random seed for reproducible calibration
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Grid JSON file to write
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Position from a two-value `--origin`
///
/// # Errors
///
/// Returns `InvalidParameter` unless exactly two values are given
pub fn parse_origin(values: &[i32]) -> Result<Coord> {
    match values {
        [x, y] => Ok(Coord::new(*x, *y)),
        _ => Err(invalid_parameter(
            "origin",
            &format!("{values:?}"),
            &"expected two values X Y",
        )),
    }
}

/// Executes a parsed command line with optional progress display
pub struct CommandRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl CommandRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the selected subcommand
    ///
    /// # Errors
    ///
    /// Returns the first error of the subcommand; nothing is written for a
    /// failed generation or calibration
    pub fn run(&mut self) -> Result<()> {
        match &self.cli.command {
            Command::Extract(args) => Self::extract(args, self.progress_manager.as_mut()),
            Command::Generate(args) => Self::generate(args, self.progress_manager.as_ref()),
            Command::Calibrate(args) => Self::calibrate(args),
        }
    }

    fn extract(args: &ExtractArgs, mut progress: Option<&mut ProgressManager>) -> Result<()> {
        let hasher = ContentHasher::new();
        let mut builder = CatalogBuilder::new(args.tile_size, hasher)?;

        if let Some(pm) = progress.as_deref_mut() {
            pm.initialize(args.maps.len());
        }

        let mut ingested = Vec::new();
        for (index, path) in args.maps.iter().enumerate() {
            if let Some(pm) = progress.as_deref_mut() {
                pm.start_map(index, path);
            }

            let map = load_source_map(path)?;
            match builder.ingest_map(&map) {
                Ok(new_tiles) => {
                    if let Some(pm) = progress.as_deref_mut() {
                        pm.complete_map(index, new_tiles);
                    }
                    ingested.push(map);
                }
                Err(e @ EngineError::MalformedInput { .. }) if !args.strict => {
                    warn!(error = %e, "skipping source map");
                    if let Some(pm) = progress.as_deref_mut() {
                        pm.skip_map(index);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        let assets = args.assets.as_ref().map(TileAssets::new);
        if let Some(assets) = &assets {
            let assigned = builder.assign_groups(assets.classified()?)?;
            info!(assigned, "applied classified groups");
        }

        let catalog = builder.finish();
        write_catalog(&catalog, &args.catalog)?;

        if let Some(assets) = &assets {
            let written = assets.write_new_tiles(&ingested, args.tile_size, &hasher)?;
            info!(written, root = %assets.root().display(), "wrote new tile assets");
        }

        if let Some(pm) = progress {
            pm.finish();
        }
        info!(
            tiles = catalog.len(),
            path = %args.catalog.display(),
            "catalog written"
        );
        Ok(())
    }

    fn load_index(path: &Path) -> Result<TileIndex> {
        let catalog = read_catalog(path)?;
        TileIndex::from_catalog(&catalog)
    }

    fn generate(args: &GenerateArgs, progress: Option<&ProgressManager>) -> Result<()> {
        let index = Self::load_index(&args.catalog)?;
        let strictness = Strictness::new(args.min_strictness)?;

        let mut session = match &args.prefill {
            Some(path) => EditorSession::from_exchange(index, &read_grid(path)?, args.seed)?,
            None => EditorSession::new(index, args.width, args.height, args.seed)?,
        };

        let origin = match &args.origin {
            Some(values) => parse_origin(values)?,
            None => {
                let (width, height) = session.grid().dimensions();
                Coord::new((width / 2) as i32, (height / 2) as i32)
            }
        };

        let report = if args.animate {
            Self::animate(
                &mut session,
                origin,
                strictness,
                Duration::from_millis(args.frame_delay_ms),
                progress,
            )?
        } else {
            session.fill(origin, strictness)?
        };

        write_grid(&session.to_exchange(), &args.output)?;

        if let (Some(png), Some(assets)) = (&args.png, &args.assets) {
            export_grid_as_png(&session, &TileAssets::new(assets), args.tile_size, png)?;
        }

        info!(
            placed = report.placed,
            remaining_empty = report.remaining_empty,
            path = %args.output.display(),
            "map written"
        );
        Ok(())
    }

    fn animate(
        session: &mut EditorSession,
        origin: Coord,
        strictness: Strictness,
        frame_delay: Duration,
        progress: Option<&ProgressManager>,
    ) -> Result<FillReport> {
        let mut run = session.fill_run(origin, strictness)?;
        let bar = progress.map(|pm| pm.fill_bar(session.grid().empty_count(), "generating"));

        while let Some(step) = run.step(session)? {
            trace!(x = step.position.x, y = step.position.y, phase = %step.phase, "animated placement");
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            thread::sleep(frame_delay);
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        Ok(*run.report())
    }

    fn calibrate(args: &CalibrateArgs) -> Result<()> {
        let index = Self::load_index(&args.catalog)?;
        let strictness = Strictness::new(args.min_strictness)?;
        let origin = parse_origin(&args.origin)?;

        let mut session = EditorSession::from_exchange(index, &read_grid(&args.grid)?, args.seed)?;
        let report = session.calibrate(origin, strictness, args.radius)?;

        write_grid(&session.to_exchange(), &args.output)?;
        info!(
            placed = report.placed,
            remaining_empty = report.remaining_empty,
            path = %args.output.display(),
            "calibrated map written"
        );
        Ok(())
    }
}
