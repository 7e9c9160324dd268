/// Command-line interface
pub mod cli;
/// Engine constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// JSON catalog and grid exchange
pub mod exchange;
/// PNG source maps, tile assets and grid composition
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Progress display
pub mod progress;
