//! JSON exchange formats for catalogs and grids

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::identity::TileIdentity;
use crate::catalog::record::TileCatalog;
use crate::io::error::{EngineError, Result, file_system_error};

/// Rectangular grid of identities, rows top to bottom
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExchange {
    /// One vector of identities per row
    pub cells: Vec<Vec<TileIdentity>>,
}

impl GridExchange {
    /// Wrap rows of identities
    pub const fn new(cells: Vec<Vec<TileIdentity>>) -> Self {
        Self { cells }
    }

    /// Dimensions implied by the array shape, as `(width, height)`
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if rows differ in length
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        let height = self.cells.len();
        let width = self.cells.first().map_or(0, Vec::len);

        if let Some((row, cells)) = self
            .cells
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(EngineError::InvalidSourceData {
                reason: format!(
                    "grid row {row} has {} cells, expected {width}",
                    cells.len()
                ),
            });
        }

        Ok((width, height))
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| file_system_error(path, "read", e))
}

fn write_document(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| file_system_error(parent, "create directory", e))?;
    }
    fs::write(path, contents).map_err(|e| file_system_error(path, "write", e))
}

/// Parse a catalog document
///
/// # Errors
///
/// Returns `Serialization` if the text is not a valid catalog
pub fn catalog_from_json(text: &str, path: &Path) -> Result<TileCatalog> {
    serde_json::from_str(text).map_err(|e| EngineError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Render a catalog document, sorted by identity
///
/// # Errors
///
/// Returns `Serialization` if encoding fails
pub fn catalog_to_json(catalog: &TileCatalog, path: &Path) -> Result<String> {
    serde_json::to_string_pretty(catalog).map_err(|e| EngineError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read a catalog from disk
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read and `Serialization` if it
/// is not a valid catalog
pub fn read_catalog(path: &Path) -> Result<TileCatalog> {
    let text = read_document(path)?;
    catalog_from_json(&text, path)
}

/// Write a catalog to disk, creating parent directories
///
/// # Errors
///
/// Returns `FileSystem` or `Serialization` on failure
pub fn write_catalog(catalog: &TileCatalog, path: &Path) -> Result<()> {
    let text = catalog_to_json(catalog, path)?;
    write_document(path, &text)
}

/// Read a grid from disk
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read and `Serialization` if it
/// is not a valid grid document
pub fn read_grid(path: &Path) -> Result<GridExchange> {
    let text = read_document(path)?;
    serde_json::from_str(&text).map_err(|e| EngineError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write a grid to disk, creating parent directories
///
/// # Errors
///
/// Returns `FileSystem` or `Serialization` on failure
pub fn write_grid(grid: &GridExchange, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(grid).map_err(|e| EngineError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_document(path, &text)
}
