//! Linear tile index to canvas cell mapping.

/// Map a tile's linear index to its destination (row, col) on the canvas.
///
/// The index is row-major into a `grid_size` x `grid_size` grid:
/// `source_row = index / grid_size`, `source_col = index % grid_size`.
/// The exporter enumerates tiles transposed relative to the canvas
/// orientation, so the destination cell swaps row and column. The swap
/// applies unconditionally, fallback grids included.
///
/// Returns `None` when either destination coordinate falls outside the
/// grid, which happens exactly when `tile_index >= grid_size^2`. The
/// caller skips such tiles and counts them as dropped.
pub fn map_tile_index(tile_index: u32, grid_size: u32) -> Option<(u32, u32)> {
    let source_row = tile_index / grid_size;
    let source_col = tile_index % grid_size;

    let dest_row = source_col;
    let dest_col = source_row;

    if dest_row >= grid_size || dest_col >= grid_size {
        return None;
    }

    Some((dest_row, dest_col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_indices_map_inside_grid() {
        for grid_size in 1u32..=8 {
            for index in 0..grid_size * grid_size {
                let (row, col) = map_tile_index(index, grid_size).unwrap();
                assert!(row < grid_size);
                assert!(col < grid_size);
            }
        }
    }

    #[test]
    fn test_transpose_inverts_to_source_cell() {
        let grid_size = 5;
        for index in 0..grid_size * grid_size {
            let (dest_row, dest_col) = map_tile_index(index, grid_size).unwrap();
            // swapping back recovers the row-major source cell
            let source_row = dest_col;
            let source_col = dest_row;
            assert_eq!(source_row * grid_size + source_col, index);
        }
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        assert_eq!(map_tile_index(16, 4), None);
        assert_eq!(map_tile_index(100, 4), None);
        assert_eq!(map_tile_index(1, 1), None);
    }

    #[test]
    fn test_diagonal_cell_is_fixed_point() {
        // index 5 in a 4x4 grid: source (1,1), transposition is a no-op
        assert_eq!(map_tile_index(5, 4), Some((1, 1)));
    }

    #[test]
    fn test_off_diagonal_cell_is_swapped() {
        // index 2 in a 4x4 grid: source (0,2) lands at dest (2,0)
        assert_eq!(map_tile_index(2, 4), Some((2, 0)));
    }
}
