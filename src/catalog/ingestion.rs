//! Catalog construction from tile-based source maps
//!
//! Partitions every source map into non-overlapping tiles, identifies each
//! tile by content, and records provenance plus the identities observed on
//! each side of every tile. Group labels from previously classified tiles
//! are applied afterwards. This module performs no file I/O.

use ndarray::{Array2, Array3, ArrayView3, Axis, Slice};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::catalog::hashing::TileHasher;
use crate::catalog::identity::TileIdentity;
use crate::catalog::record::{TileCatalog, TileRecord};
use crate::io::configuration::UNDEFINED_GROUP;
use crate::io::error::{EngineError, Result, invalid_parameter};
use crate::spatial::direction::Direction;

/// A decoded source map with its provenance label
#[derive(Clone, Debug)]
pub struct SourceMap {
    /// Provenance label recorded into every tile seen in this map
    pub label: String,
    /// RGBA pixels shaped `(height, width, 4)`
    pub pixels: Array3<u8>,
}

impl SourceMap {
    /// Wrap decoded pixels with a label
    pub fn new(label: impl Into<String>, pixels: Array3<u8>) -> Self {
        Self {
            label: label.into(),
            pixels,
        }
    }

    /// Map width in pixels
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    /// Map height in pixels
    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }
}

/// Partition a map into a grid of tile identities, indexed `[row, col]`
///
/// # Errors
///
/// Returns `MalformedInput` if the map dimensions are not multiples of
/// `tile_size`, and `InvalidParameter` if `tile_size` is zero.
pub fn partition_map<H: TileHasher + ?Sized>(
    map: &SourceMap,
    tile_size: usize,
    hasher: &H,
) -> Result<Array2<TileIdentity>> {
    if tile_size == 0 {
        return Err(invalid_parameter(
            "tile_size",
            &tile_size,
            &"must be positive",
        ));
    }

    let (height, width) = (map.height(), map.width());
    if width % tile_size != 0 || height % tile_size != 0 {
        return Err(EngineError::MalformedInput {
            label: map.label.clone(),
            width,
            height,
            tile_size,
        });
    }

    let rows = height / tile_size;
    let cols = width / tile_size;

    Ok(Array2::from_shape_fn((rows, cols), |(row, col)| {
        hasher.identify(tile_block(map, row, col, tile_size))
    }))
}

/// Pixel block of the tile at `[row, col]`
///
/// The position must lie inside the tile grid returned by [`partition_map`].
pub fn tile_block(
    map: &SourceMap,
    row: usize,
    col: usize,
    tile_size: usize,
) -> ArrayView3<'_, u8> {
    let top = (row * tile_size) as isize;
    let left = (col * tile_size) as isize;
    map.pixels
        .slice_axis(Axis(0), Slice::from(top..top + tile_size as isize))
        .slice_axis_move(Axis(1), Slice::from(left..left + tile_size as isize))
}

/// Accumulates tile records across source maps
///
/// Records stay unclassified until [`CatalogBuilder::assign_groups`] runs;
/// [`CatalogBuilder::finish`] defaults whatever is still unclassified.
pub struct CatalogBuilder<H> {
    tile_size: usize,
    hasher: H,
    records: BTreeMap<TileIdentity, TileRecord>,
    groups: BTreeMap<TileIdentity, String>,
    maps_ingested: usize,
}

impl<H: TileHasher> CatalogBuilder<H> {
    /// Create a builder for a fixed tile size
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `tile_size` is zero
    pub fn new(tile_size: usize, hasher: H) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &"must be positive",
            ));
        }

        Ok(Self {
            tile_size,
            hasher,
            records: BTreeMap::new(),
            groups: BTreeMap::new(),
            maps_ingested: 0,
        })
    }

    /// Tile edge length in pixels
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// The hasher used to identify tiles
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of distinct tiles seen so far
    pub fn tile_count(&self) -> usize {
        self.records.len()
    }

    /// Number of maps successfully ingested
    pub const fn maps_ingested(&self) -> usize {
        self.maps_ingested
    }

    /// Ingest one source map
    ///
    /// Returns the number of tiles seen for the first time. A malformed map
    /// leaves the builder unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the map dimensions are not multiples of the
    /// tile size
    pub fn ingest_map(&mut self, map: &SourceMap) -> Result<usize> {
        let identities = partition_map(map, self.tile_size, &self.hasher)?;
        let (rows, cols) = identities.dim();

        // Pass 1: records and provenance
        let mut new_tiles = 0;
        for identity in &identities {
            if identity.is_reserved() {
                continue;
            }
            let record = self.records.entry(identity.clone()).or_insert_with(|| {
                new_tiles += 1;
                TileRecord::new()
            });
            record.origins.insert(map.label.clone());
        }

        // Pass 2: directional observations
        for row in 0..rows {
            for col in 0..cols {
                let Some(identity) = identities.get((row, col)) else {
                    continue;
                };
                if identity.is_reserved() {
                    continue;
                }

                for direction in Direction::ALL {
                    let (dx, dy) = direction.offset();
                    let neighbor_row = row as isize + dy as isize;
                    let neighbor_col = col as isize + dx as isize;
                    if neighbor_row < 0 || neighbor_col < 0 {
                        continue;
                    }

                    let Some(neighbor) = identities.get((neighbor_row as usize, neighbor_col as usize))
                    else {
                        continue;
                    };
                    if neighbor.is_reserved() {
                        continue;
                    }

                    if let Some(record) = self.records.get_mut(identity) {
                        record.neighbors_mut(direction).insert(neighbor.clone());
                    }
                }
            }
        }

        self.maps_ingested += 1;
        debug!(
            label = %map.label,
            rows,
            cols,
            new_tiles,
            "ingested source map"
        );

        Ok(new_tiles)
    }

    /// Ingest several maps in order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first `MalformedInput` encountered; maps before it remain
    /// ingested
    pub fn ingest<'a, I>(&mut self, maps: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SourceMap>,
    {
        for map in maps {
            self.ingest_map(map)?;
        }
        Ok(())
    }

    /// Apply group labels from previously classified tiles
    ///
    /// # Errors
    ///
    /// Returns `DanglingReference` for a classified identity the catalog has
    /// never observed; no labels from the batch are applied in that case
    pub fn assign_groups<I, G>(&mut self, classified: I) -> Result<usize>
    where
        I: IntoIterator<Item = (TileIdentity, G)>,
        G: Into<String>,
    {
        let mut pending = Vec::new();
        for (identity, group) in classified {
            if !self.records.contains_key(&identity) {
                return Err(EngineError::DanglingReference {
                    identity,
                    context: "classified tile assets".to_string(),
                });
            }
            pending.push((identity, group.into()));
        }

        let assigned = pending.len();
        self.groups.extend(pending);
        Ok(assigned)
    }

    /// Produce the catalog, defaulting unclassified tiles to `UNDEFINED`
    pub fn finish(self) -> TileCatalog {
        let Self {
            mut records,
            groups,
            maps_ingested,
            ..
        } = self;

        for (identity, record) in &mut records {
            record.group = groups
                .get(identity)
                .cloned()
                .unwrap_or_else(|| UNDEFINED_GROUP.to_string());
        }

        let catalog = TileCatalog::from_records(records);
        info!(
            tiles = catalog.len(),
            maps = maps_ingested,
            classified = groups.len(),
            "catalog built"
        );
        catalog
    }
}
