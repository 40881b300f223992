//! Grid dimension inference from a tile count.

use crate::MosaicError;

/// Default grid dimension applied when a tile set is irregular.
pub const DEFAULT_FALLBACK_GRID: u32 = 4;

/// Policy for tile counts that are not a perfect square.
///
/// Exports are nominally square grids; an irregular count means a
/// partial or corrupted export. The fixed-size fallback keeps the
/// batch running in a degraded mode: tiles whose index lands outside
/// the fallback grid get rejected downstream by the index mapper and
/// are dropped from the mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFallback {
    /// Assemble on a fixed grid anyway, dropping tiles that don't fit.
    FixedSize(u32),
    /// Treat an irregular count as an error.
    Fail,
}

impl Default for GridFallback {
    fn default() -> Self {
        GridFallback::FixedSize(DEFAULT_FALLBACK_GRID)
    }
}

/// Infer the (square) grid dimension for `tile_count` tiles.
///
/// A perfect square count resolves to its exact root. Anything else,
/// including zero, resolves through the fallback policy. Callers must
/// still skip assembly entirely for empty tile sets; resolving zero
/// only keeps the returned dimension positive.
pub fn resolve_grid_size(tile_count: usize, fallback: GridFallback) -> Result<u32, MosaicError> {
    // f64 sqrt is exact for perfect squares in this range
    let root = (tile_count as f64).sqrt() as usize;
    if root > 0 && root * root == tile_count {
        return Ok(root as u32);
    }

    match fallback {
        GridFallback::FixedSize(size) => {
            tracing::warn!(
                tile_count,
                grid_size = size,
                "tile count is not a perfect square, using fallback grid"
            );
            Ok(size)
        }
        GridFallback::Fail => Err(MosaicError::IrregularTileCount { count: tile_count }),
    }
}
