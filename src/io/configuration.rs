//! Engine constants and runtime configuration defaults

/// Default tile edge length in pixels
pub const DEFAULT_TILE_SIZE: usize = 16;

/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;

/// Lowest strictness tier reached by supplemental passes unless overridden
pub const DEFAULT_MIN_STRICTNESS: u8 = 2;

/// Half-width of the square region refilled by calibration
pub const DEFAULT_CALIBRATION_RADIUS: usize = 2;

/// Default generated map width in tiles
pub const DEFAULT_MAP_WIDTH: usize = 32;

/// Default generated map height in tiles
pub const DEFAULT_MAP_HEIGHT: usize = 32;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// Group assigned to tiles that were never classified
pub const UNDEFINED_GROUP: &str = "UNDEFINED";

/// File extension of tile asset images
pub const TILE_ASSET_EXTENSION: &str = "png";

// Animation pacing
/// Delay between cell mutations in animated generation
pub const DEFAULT_FRAME_DELAY_MS: u64 = 10;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
