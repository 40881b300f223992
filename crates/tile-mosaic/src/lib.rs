//! Tile mosaic reconstruction.
//!
//! Upstream exports deliver a mosaic as an unordered set of square
//! tiles named by a linear index. This crate infers the grid
//! dimension from the tile count, maps each linear index to its
//! destination cell (the exporter enumerates tiles transposed
//! relative to the canvas, so row and column are swapped), and
//! composites the tiles onto one canvas.
//!
//! Missing, malformed, or out-of-bounds tiles are dropped rather than
//! failing the batch; the assembler reports how many of the
//! discovered tiles it actually placed.

pub mod assemble;
pub mod discover;
pub mod error;
pub mod grid;
pub mod index;

pub use assemble::{assemble, read_tile_side, MosaicStats};
pub use discover::{discover_tiles, parse_tile_index, TileFile};
pub use error::MosaicError;
pub use grid::{resolve_grid_size, GridFallback, DEFAULT_FALLBACK_GRID};
pub use index::map_tile_index;
