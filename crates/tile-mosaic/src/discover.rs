//! Tile file discovery and identifier parsing.

use std::path::{Path, PathBuf};

use crate::MosaicError;

/// Raster extensions accepted as tile images.
const TILE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// One discovered tile file.
#[derive(Debug, Clone)]
pub struct TileFile {
    pub path: PathBuf,
    /// File name without extension; carries the linear index as its
    /// third underscore-delimited segment.
    pub stem: String,
}

/// List the tile images in `dir`, sorted by file name.
///
/// The lexical sort corresponds to ascending numeric index under the
/// export naming convention; this is a precondition of stitching, not
/// something verified here. Non-raster entries and subdirectories are
/// ignored.
pub fn discover_tiles(dir: &Path) -> Result<Vec<TileFile>, MosaicError> {
    let entries = std::fs::read_dir(dir).map_err(|source| MosaicError::TileListing {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut tiles = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MosaicError::TileListing {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_raster = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| TILE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !is_raster {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            tiles.push(TileFile {
                stem: stem.to_string(),
                path,
            });
        }
    }

    tiles.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(tiles)
}

/// Parse the linear tile index from a file stem.
///
/// The convention is `<area>_<layer>_<index>`: the index is the third
/// underscore-delimited segment, base 10. Stems with fewer than three
/// segments or a non-numeric third segment are malformed and yield
/// `None`; the caller drops the tile.
pub fn parse_tile_index(stem: &str) -> Option<u32> {
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    parts[2].parse().ok()
}
