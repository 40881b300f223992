//! Error types for mosaic assembly.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("tile count {count} does not form a square grid")]
    IrregularTileCount { count: usize },

    #[error("failed to decode tile {path}: {source}")]
    TileDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to list tiles in {path}: {source}")]
    TileListing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
