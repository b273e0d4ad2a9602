// Board generation for DotMerge Core
//
// Each pair is built from one random permutation of the grid coordinates:
// a prefix of it is grey in tile A and colored in tile B, the rest the other
// way around. Colors are drawn independently per colored cell.

use rand::Rng;
use std::ops::RangeInclusive;

use crate::board::Board;
use crate::config::{MAX_GRID_CELLS, MAX_PAIRS};
use crate::grid::{Cell, Color, Grid};
use crate::ids::{IdSource, PairKey};
use crate::tile::Tile;
use crate::types::{DotMergeError, Result};
use crate::utils::shuffle_vec;

/// Inclusive range of grey cells in tile A: ceil(30%) ..= ceil(60%) of the grid
pub fn grey_count_range(total_cells: usize) -> RangeInclusive<usize> {
    let min = (3 * total_cells + 9) / 10;
    let max = (6 * total_cells + 9) / 10;
    min..=max
}

/// Generate two complementary tiles sharing `pair_key`
pub fn generate_pair<R: Rng + ?Sized>(
    rng: &mut R,
    ids: &mut IdSource,
    rows: usize,
    cols: usize,
    pair_key: PairKey,
) -> Result<(Tile, Tile)> {
    let total_cells = rows.checked_mul(cols).unwrap_or(0);
    if total_cells == 0 || total_cells > MAX_GRID_CELLS {
        return Err(DotMergeError::InvalidGrid(format!(
            "Cannot generate tiles for a {}x{} grid",
            rows, cols
        )));
    }

    let grey_count = rng.gen_range(grey_count_range(total_cells));

    let mut positions: Vec<usize> = (0..total_cells).collect();
    shuffle_vec(&mut positions, rng);
    let mut grey_in_a = vec![false; total_cells];
    for &pos in &positions[..grey_count] {
        grey_in_a[pos] = true;
    }

    let mut cells_a = Vec::with_capacity(total_cells);
    let mut cells_b = Vec::with_capacity(total_cells);
    for &grey in &grey_in_a {
        let colored = Cell::Colored(Color::random(rng));
        if grey {
            cells_a.push(Cell::Grey);
            cells_b.push(colored);
        } else {
            cells_a.push(colored);
            cells_b.push(Cell::Grey);
        }
    }

    let tile_a = Tile::new(ids.tile_id(rng), Grid::new(rows, cols, cells_a)?, pair_key);
    let tile_b = Tile::new(ids.tile_id(rng), Grid::new(rows, cols, cells_b)?, pair_key);
    Ok((tile_a, tile_b))
}

/// Generate `pair_count` pairs and shuffle them into a board
pub fn generate_board<R: Rng + ?Sized>(
    rng: &mut R,
    pair_count: usize,
    rows: usize,
    cols: usize,
) -> Result<Board> {
    if pair_count > MAX_PAIRS {
        return Err(DotMergeError::InvalidGrid(format!(
            "Cannot generate {} pairs (max {})",
            pair_count, MAX_PAIRS
        )));
    }
    let mut ids = IdSource::new();
    let mut tiles = Vec::with_capacity(pair_count * 2);

    for _ in 0..pair_count {
        let pair_key = ids.pair_key(rng);
        let (a, b) = generate_pair(rng, &mut ids, rows, cols, pair_key)?;
        tiles.push(a);
        tiles.push(b);
    }

    shuffle_vec(&mut tiles, rng);
    Ok(Board::new(tiles))
}
