//! Error types and context management for catalog and generation operations

use std::fmt;
use std::path::PathBuf;

use crate::catalog::identity::TileIdentity;
use crate::spatial::grid::Coord;

/// Main error type for all catalog, editing and generation operations
#[derive(Debug)]
pub enum EngineError {
    /// Source map dimensions are not a multiple of the tile size
    MalformedInput {
        /// Provenance label of the offending map (usually its file name)
        label: String,
        /// Map width in pixels
        width: usize,
        /// Map height in pixels
        height: usize,
        /// Tile edge length in pixels
        tile_size: usize,
    },

    /// An identity is referenced that the catalog never observed
    ///
    /// Raised when a classified tile asset or a directional neighbor entry
    /// names an identity with no catalog record. Catalog integrity cannot be
    /// guaranteed afterwards, so ingestion aborts.
    DanglingReference {
        /// The unknown identity
        identity: TileIdentity,
        /// Where the reference was found
        context: String,
    },

    /// The constraint voter accepted nothing at the requested strictness
    NoCandidate {
        /// Cell that could not be filled
        position: Coord,
        /// Strictness tier used for the vote
        strictness: u8,
    },

    /// None of the four calibration corners admits a fill
    NoValidCalibrationStart {
        /// Calibration origin
        origin: Coord,
        /// Calibration radius
        radius: usize,
    },

    /// Grid access outside the current map bounds
    OutOfBounds {
        /// Requested position
        position: Coord,
        /// Current grid dimensions (width, height)
        dimensions: (usize, usize),
    },

    /// A tile reference or identity that the loaded catalog does not contain
    UnknownTile {
        /// Printable form of the unknown tile
        tile: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Input data is structurally unusable
    InvalidSourceData {
        /// Description of what's wrong with the data
        reason: String,
    },

    /// Failed to load a source image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Catalog or grid exchange document could not be (de)serialized
    Serialization {
        /// Path of the document
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput {
                label,
                width,
                height,
                tile_size,
            } => {
                write!(
                    f,
                    "Malformed map '{label}': {width}x{height} is not a multiple of tile size {tile_size}"
                )
            }
            Self::DanglingReference { identity, context } => {
                write!(
                    f,
                    "Tile '{identity}' referenced by {context} is not present in the catalog"
                )
            }
            Self::NoCandidate {
                position,
                strictness,
            } => {
                write!(
                    f,
                    "No candidate tile for cell {position} at strictness {strictness}"
                )
            }
            Self::NoValidCalibrationStart { origin, radius } => {
                write!(
                    f,
                    "No corner admits a fill when calibrating around {origin} with radius {radius}"
                )
            }
            Self::OutOfBounds {
                position,
                dimensions,
            } => {
                write!(
                    f,
                    "Position {position} is outside the {}x{} map",
                    dimensions.0, dimensions.1
                )
            }
            Self::UnknownTile { tile } => {
                write!(f, "Tile '{tile}' is not part of the loaded catalog")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(
                    f,
                    "Failed to (de)serialize '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl EngineError {
    /// Whether the error is an expected per-operation outcome rather than a
    /// broken input or programming error
    ///
    /// Recoverable errors leave the grid untouched and may be retried with
    /// relaxed parameters.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoCandidate { .. } | Self::NoValidCalibrationStart { .. }
        )
    }
}

/// Convenience type alias for engine results
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<image::ImageError> for EngineError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> EngineError {
    EngineError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to the path and operation that failed
pub fn file_system_error(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> EngineError {
    EngineError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
