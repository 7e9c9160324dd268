//! Spatial data structures and neighbor lookups
//!
//! This module contains spatial-related functionality including:
//! - Cardinal directions and their opposites
//! - Grid state, positions, regions and the cursor
//! - Neighbor candidate sets for the constraint voter

/// Cardinal directions
pub mod direction;
/// Grid state, positions and regions
pub mod grid;
/// Neighbor queries feeding the constraint voter
pub mod neighbors;

pub use grid::{Coord, Grid, Region};
