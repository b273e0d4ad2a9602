// Tile implementation for DotMerge Core

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::ids::{PairKey, TileId};

/// One draggable game piece
///
/// Tiles are created in complementary pairs that share a `pair_key`.
/// After a successful pairing both are `matched`; the first tile of the
/// pairing keeps the merged grid and the second records `merged_into`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: TileId,
    pub grid: Grid,
    pub pair_key: PairKey,
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_into: Option<TileId>,
}

impl Tile {
    pub fn new(id: TileId, grid: Grid, pair_key: PairKey) -> Tile {
        Tile {
            id,
            grid,
            pair_key,
            matched: false,
            merged_into: None,
        }
    }

    /// Still shown on the board (not absorbed by its partner)
    pub fn is_visible(&self) -> bool {
        self.merged_into.is_none()
    }

    /// Matched and carrying the merged grid
    pub fn is_completed(&self) -> bool {
        self.matched && self.merged_into.is_none()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }
}

/// Cell-wise complementary check, guarded on dimensions
pub fn tiles_match(x: &Tile, y: &Tile) -> bool {
    x.grid.is_complementary(&y.grid)
}

/// Merged grid of a matching pair: the colored cell wins at every coordinate.
///
/// Callers must check `tiles_match` first.
pub fn merge_grids(x: &Tile, y: &Tile) -> Grid {
    x.grid.merged_with(&y.grid)
}
