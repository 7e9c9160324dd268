//! Content hashing of fixed-size pixel blocks into tile identities

use ndarray::ArrayView3;

use crate::catalog::identity::TileIdentity;

/// Computes the identity of a tile from its raw RGBA pixel block
///
/// Blocks are shaped `(height, width, channels)`. Implementations must be
/// deterministic: equal blocks yield equal identities.
pub trait TileHasher {
    /// Identify a single block
    fn identify(&self, block: ArrayView3<'_, u8>) -> TileIdentity;
}

/// Default hasher: blake3 over the block shape and RGBA bytes
///
/// Fully transparent blocks identify as the EMPTY sentinel so they never
/// enter the catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHasher;

impl ContentHasher {
    /// Create the default hasher
    pub const fn new() -> Self {
        Self
    }
}

impl TileHasher for ContentHasher {
    fn identify(&self, block: ArrayView3<'_, u8>) -> TileIdentity {
        let (height, width, channels) = block.dim();

        let transparent = channels >= 4
            && block
                .outer_iter()
                .all(|row| row.outer_iter().all(|pixel| pixel.get(3) == Some(&0)));
        if transparent {
            return TileIdentity::empty();
        }

        let mut hasher = blake3::Hasher::new();
        hasher.update(&(height as u64).to_le_bytes());
        hasher.update(&(width as u64).to_le_bytes());
        hasher.update(&(channels as u64).to_le_bytes());
        // Logical order, the view may be non-contiguous
        let bytes: Vec<u8> = block.iter().copied().collect();
        hasher.update(&bytes);

        TileIdentity::new(hasher.finalize().to_hex().as_str())
    }
}
