//! Tile catalog construction and interning
//!
//! This module contains catalog-related functionality including:
//! - Tile identities and the reserved EMPTY and CURSOR markers
//! - Content hashing of pixel blocks
//! - Catalog records and ingestion from source maps
//! - Dense tile references for the generation engine

/// Content hashing of tile pixel blocks
pub mod hashing;
/// Tile identity keys and reserved markers
pub mod identity;
/// Dense tile references and per-direction neighbor sets
pub mod index;
/// Catalog construction from source maps
pub mod ingestion;
/// Catalog records keyed by identity
pub mod record;
