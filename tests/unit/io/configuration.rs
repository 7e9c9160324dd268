//! Tests for engine constants and defaults

#[cfg(test)]
mod tests {
    use tileweave::algorithm::selection::Strictness;
    use tileweave::io::configuration::{
        DEFAULT_CALIBRATION_RADIUS, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH,
        DEFAULT_MIN_STRICTNESS, DEFAULT_SEED, DEFAULT_TILE_SIZE, MAX_GRID_DIMENSION,
        MAX_INDIVIDUAL_PROGRESS_BARS, TILE_ASSET_EXTENSION, UNDEFINED_GROUP,
    };

    // Tests the default strictness is a usable tier
    // Verified by setting the default above the strictest tier
    #[test]
    fn test_default_strictness_is_valid() {
        let strictness = Strictness::new(DEFAULT_MIN_STRICTNESS).unwrap();
        assert!(strictness <= Strictness::MAX);
        assert!(strictness >= Strictness::MIN);
    }

    // Tests default map dimensions fit under the grid limit
    // Verified by raising the defaults past the limit
    #[test]
    fn test_default_dimensions() {
        assert!(DEFAULT_MAP_WIDTH > 0 && DEFAULT_MAP_WIDTH <= MAX_GRID_DIMENSION);
        assert!(DEFAULT_MAP_HEIGHT > 0 && DEFAULT_MAP_HEIGHT <= MAX_GRID_DIMENSION);
        assert_eq!(MAX_GRID_DIMENSION, 10_000);
    }

    // Tests asset and tile defaults
    // Verified by changing constant values
    #[test]
    fn test_asset_defaults() {
        assert_eq!(DEFAULT_TILE_SIZE, 16);
        assert_eq!(UNDEFINED_GROUP, "UNDEFINED");
        assert_eq!(TILE_ASSET_EXTENSION, "png");
        assert_eq!(DEFAULT_CALIBRATION_RADIUS, 2);
        assert_eq!(DEFAULT_SEED, 42);
        assert!(MAX_INDIVIDUAL_PROGRESS_BARS > 0);
    }
}
