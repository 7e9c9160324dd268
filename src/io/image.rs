//! PNG decoding of source maps, classified tile assets and grid composition

use image::{RgbaImage, imageops};
use ndarray::Array3;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::catalog::hashing::TileHasher;
use crate::catalog::identity::TileIdentity;
use crate::catalog::index::{EMPTY_TILE, TileRef};
use crate::catalog::ingestion::{SourceMap, partition_map, tile_block};
use crate::editor::session::EditorSession;
use crate::io::configuration::{TILE_ASSET_EXTENSION, UNDEFINED_GROUP};
use crate::io::error::{EngineError, Result, file_system_error, invalid_parameter};

/// Decode a PNG into RGBA pixels labelled with its file name
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be decoded
pub fn load_source_map(path: &Path) -> Result<SourceMap> {
    let img = image::open(path).map_err(|e| EngineError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = Array3::from_shape_vec((height as usize, width as usize, 4), rgba.into_raw())
        .map_err(|e| EngineError::InvalidSourceData {
            reason: format!("{}: {e}", path.display()),
        })?;

    let label = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    Ok(SourceMap::new(label, pixels))
}

fn has_asset_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(TILE_ASSET_EXTENSION)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| file_system_error(dir, "read directory", e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| file_system_error(dir, "read directory", e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Tile images stored as `<root>/<group>/<identity>.png`
///
/// The directory a tile image sits in is its group; moving a file between
/// directories is how tiles are classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileAssets {
    root: PathBuf,
}

impl TileAssets {
    /// Assets under `root`; the directory need not exist yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of an identity's image inside a group
    pub fn asset_path(&self, group: &str, identity: &TileIdentity) -> PathBuf {
        self.root
            .join(group)
            .join(format!("{identity}.{TILE_ASSET_EXTENSION}"))
    }

    fn assets(&self) -> Result<Vec<(TileIdentity, String, PathBuf)>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        for group_dir in read_dir_sorted(&self.root)? {
            if !group_dir.is_dir() {
                continue;
            }
            let group = group_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            for file in read_dir_sorted(&group_dir)? {
                if !file.is_file() || !has_asset_extension(&file) {
                    continue;
                }
                if let Some(stem) = file.file_stem() {
                    let identity = TileIdentity::new(stem.to_string_lossy());
                    assets.push((identity, group.clone(), file));
                }
            }
        }
        Ok(assets)
    }

    /// Every `(identity, group)` pair found on disk, sorted by group then
    /// identity
    ///
    /// # Errors
    ///
    /// Returns `FileSystem` if a directory cannot be listed
    pub fn classified(&self) -> Result<Vec<(TileIdentity, String)>> {
        Ok(self
            .assets()?
            .into_iter()
            .map(|(identity, group, _)| (identity, group))
            .collect())
    }

    /// Write the tile images of every identity that has no asset yet into
    /// the `UNDEFINED` group, returning how many were written
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for a map that does not partition evenly,
    /// `FileSystem` if the group directory cannot be created and
    /// `ImageExport` if an image cannot be written
    pub fn write_new_tiles<'a, I, H>(&self, maps: I, tile_size: usize, hasher: &H) -> Result<usize>
    where
        I: IntoIterator<Item = &'a SourceMap>,
        H: TileHasher + ?Sized,
    {
        let mut known: BTreeSet<TileIdentity> = self
            .classified()?
            .into_iter()
            .map(|(identity, _)| identity)
            .collect();

        let side = u32::try_from(tile_size)
            .map_err(|e| invalid_parameter("tile_size", &tile_size, &e))?;
        let group_dir = self.root.join(UNDEFINED_GROUP);
        let mut written = 0;

        for map in maps {
            let identities = partition_map(map, tile_size, hasher)?;
            for ((row, col), identity) in identities.indexed_iter() {
                if identity.is_reserved() || known.contains(identity) {
                    continue;
                }

                let block = tile_block(map, row, col, tile_size);
                let Some(tile) = RgbaImage::from_raw(side, side, block.iter().copied().collect())
                else {
                    return Err(EngineError::InvalidSourceData {
                        reason: format!("{} is not an RGBA map", map.label),
                    });
                };

                fs::create_dir_all(&group_dir)
                    .map_err(|e| file_system_error(&group_dir, "create directory", e))?;
                let path = self.asset_path(UNDEFINED_GROUP, identity);
                tile.save(&path)
                    .map_err(|e| EngineError::ImageExport { path, source: e })?;

                known.insert(identity.clone());
                written += 1;
            }
        }

        debug!(written, root = %self.root.display(), "tile assets written");
        Ok(written)
    }

    fn paths_by_identity(&self) -> Result<HashMap<TileIdentity, PathBuf>> {
        Ok(self
            .assets()?
            .into_iter()
            .map(|(identity, _, path)| (identity, path))
            .collect())
    }
}

/// Pixel dimensions of a composed `(width, height)` grid
///
/// # Errors
///
/// Returns `InvalidParameter` if `tile_size` is zero or the image would not
/// fit in memory addressable by the image buffer
pub fn canvas_dimensions(grid: (usize, usize), tile_size: usize) -> Result<(u32, u32)> {
    if tile_size == 0 {
        return Err(invalid_parameter("tile_size", &tile_size, &"must be positive"));
    }
    let too_large = || {
        invalid_parameter(
            "tile_size",
            &tile_size,
            &format!("a {}x{} map does not fit in one image", grid.0, grid.1),
        )
    };

    let width = grid.0.checked_mul(tile_size).and_then(|w| u32::try_from(w).ok());
    let height = grid.1.checked_mul(tile_size).and_then(|h| u32::try_from(h).ok());
    let (Some(width), Some(height)) = (width, height) else {
        return Err(too_large());
    };

    let bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4));
    if bytes.is_none_or(|bytes| bytes > isize::MAX as usize) {
        return Err(too_large());
    }
    Ok((width, height))
}

/// Compose the session's grid from tile assets into a PNG
///
/// EMPTY cells and tiles without an asset stay transparent.
///
/// # Errors
///
/// Returns `ImageLoad` if an asset cannot be decoded, `FileSystem` if the
/// output directory cannot be created and `ImageExport` if the image
/// cannot be written
pub fn export_grid_as_png(
    session: &EditorSession,
    assets: &TileAssets,
    tile_size: usize,
    output_path: &Path,
) -> Result<()> {
    let grid = session.grid();
    let (width, height) = canvas_dimensions(grid.dimensions(), tile_size)?;
    let side = tile_size as u32;
    let paths = assets.paths_by_identity()?;

    let mut canvas = RgbaImage::new(width, height);
    let mut loaded: HashMap<TileRef, Option<RgbaImage>> = HashMap::new();

    for ((row, col), &tile) in grid.cells().indexed_iter() {
        if tile == EMPTY_TILE {
            continue;
        }

        if !loaded.contains_key(&tile) {
            let image = match session.index().identity(tile).and_then(|id| paths.get(&id)) {
                Some(path) => Some(
                    image::open(path)
                        .map_err(|e| EngineError::ImageLoad {
                            path: path.clone(),
                            source: e,
                        })?
                        .to_rgba8(),
                ),
                None => {
                    warn!(tile, "no asset for tile, leaving it transparent");
                    None
                }
            };
            loaded.insert(tile, image);
        }

        if let Some(Some(image)) = loaded.get(&tile) {
            let x = i64::from(col as u32 * side);
            let y = i64::from(row as u32 * side);
            imageops::replace(&mut canvas, image, x, y);
        }
    }

    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(|e| file_system_error(parent, "create directory", e))?;
    }

    canvas
        .save(output_path)
        .map_err(|e| EngineError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
