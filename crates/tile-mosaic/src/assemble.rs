//! Canvas allocation and tile compositing.

use std::path::Path;

use image::{imageops, GenericImageView, Rgb, RgbImage};
use tracing::warn;

use crate::discover::{parse_tile_index, TileFile};
use crate::index::map_tile_index;
use crate::MosaicError;

/// Canvas background fill for cells with no tile.
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// How many of the discovered tiles made it onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicStats {
    pub placed: usize,
    pub total: usize,
}

impl MosaicStats {
    /// Human-readable placement ratio, e.g. "12/16 tiles placed (4x4)".
    pub fn summary(&self, grid_size: u32) -> String {
        format!(
            "{}/{} tiles placed ({}x{})",
            self.placed, self.total, grid_size, grid_size
        )
    }
}

/// Read the side length of a tile from its image header.
///
/// The side is taken from the width of the first tile of a set and
/// assumed for the rest; tiles that disagree are rejected during
/// assembly.
pub fn read_tile_side(path: &Path) -> Result<u32, MosaicError> {
    let (width, _height) =
        image::image_dimensions(path).map_err(|source| MosaicError::TileDecode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(width)
}

/// Composite a tile set onto a single RGB canvas.
///
/// The canvas is `(grid_size * tile_side)` pixels square, filled with
/// black. Tiles are processed in the given order (lexical file-name
/// order from discovery). Per tile:
///
/// - a stem that does not carry an index is malformed: dropped;
/// - an index the mapper rejects (outside the grid): dropped;
/// - decoded dimensions other than `tile_side` square: dropped;
/// - otherwise the tile is pasted at
///   `(dest_col * tile_side, dest_row * tile_side)`, overwriting.
///
/// Dropped tiles only lower `placed` in the returned stats. A tile
/// image that fails to decode is the one fatal case: the whole
/// assembly errors and the caller fails the year's imagery substep.
pub fn assemble(
    tiles: &[TileFile],
    grid_size: u32,
    tile_side: u32,
) -> Result<(RgbImage, MosaicStats), MosaicError> {
    let canvas_side = grid_size * tile_side;
    let mut canvas = RgbImage::from_pixel(canvas_side, canvas_side, BACKGROUND);

    let mut placed = 0usize;
    for tile in tiles {
        let Some(tile_index) = parse_tile_index(&tile.stem) else {
            warn!(stem = %tile.stem, "malformed tile name, skipping");
            continue;
        };

        let Some((dest_row, dest_col)) = map_tile_index(tile_index, grid_size) else {
            warn!(tile_index, grid_size, "tile index out of grid bounds, skipping");
            continue;
        };

        let img = image::open(&tile.path).map_err(|source| MosaicError::TileDecode {
            path: tile.path.clone(),
            source,
        })?;

        if img.width() != tile_side || img.height() != tile_side {
            warn!(
                stem = %tile.stem,
                width = img.width(),
                height = img.height(),
                expected = tile_side,
                "tile dimensions disagree with the set, skipping"
            );
            continue;
        }

        imageops::replace(
            &mut canvas,
            &img.to_rgb8(),
            (dest_col * tile_side) as i64,
            (dest_row * tile_side) as i64,
        );
        placed += 1;
    }

    Ok((
        canvas,
        MosaicStats {
            placed,
            total: tiles.len(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_summary() {
        let stats = MosaicStats {
            placed: 12,
            total: 16,
        };
        assert_eq!(stats.summary(4), "12/16 tiles placed (4x4)");
    }
}
