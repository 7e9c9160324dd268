//! Tile adjacency catalogs and constraint-voted map generation
//!
//! Source maps are cut into fixed-size tiles identified by content. The
//! catalog records which tiles were observed next to which in each
//! direction, and the generator fills a grid outward from a seed by voting
//! over the neighbors already placed, relaxing strictness for what remains.

#![forbid(unsafe_code)]

/// Constraint voting, fill propagation and calibration
pub mod algorithm;
/// Tile identities, catalog records and ingestion
pub mod catalog;
/// Editing session and undo/redo history
pub mod editor;
/// Input/output operations and error handling
pub mod io;
/// Grid, directions and neighbor queries
pub mod spatial;

pub use io::error::{EngineError, Result};
