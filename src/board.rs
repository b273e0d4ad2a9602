// Board: the shuffled tiles of one session

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::grid::Grid;
use crate::ids::{PairKey, TileId};
use crate::tile::{merge_grids, Tile};
use crate::types::{DotMergeError, Result};

/// Ordered tiles in the order they are presented to the player
///
/// Absorbed tiles stay in the board (flagged via `merged_into`) so that
/// pair accounting never loses a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    pub fn new(tiles: Vec<Tile>) -> Board {
        Board { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == id)
    }

    /// Tiles still on screen, in presentation order
    pub fn visible_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_visible())
    }

    /// Number of distinct pair keys
    pub fn pair_count(&self) -> usize {
        self.tiles.len() / 2
    }

    /// Pairs whose tiles are still unmatched
    pub fn remaining_pairs(&self) -> usize {
        self.tiles.iter().filter(|t| !t.matched).count() / 2
    }

    /// Every pair key is carried by exactly two tiles
    pub fn pairs_are_consistent(&self) -> bool {
        let mut per_key: HashMap<PairKey, usize> = HashMap::new();
        for tile in &self.tiles {
            *per_key.entry(tile.pair_key).or_default() += 1;
        }
        per_key.values().all(|&n| n == 2)
    }

    /// Resolve a successful pairing.
    ///
    /// Marks both tiles matched, gives `survivor` the merged grid and flags
    /// `absorbed` as merged into it. The caller has already checked
    /// `tiles_match`. Returns the merged grid.
    pub fn resolve_pair(&mut self, survivor: TileId, absorbed: TileId) -> Result<Grid> {
        if survivor == absorbed {
            return Err(DotMergeError::InvalidOperation(format!(
                "Tile {} cannot be merged with itself",
                survivor
            )));
        }
        let survivor_idx = self.index_of(survivor)?;
        let absorbed_idx = self.index_of(absorbed)?;

        let merged = merge_grids(&self.tiles[survivor_idx], &self.tiles[absorbed_idx]);

        let absorbed_tile = &mut self.tiles[absorbed_idx];
        absorbed_tile.matched = true;
        absorbed_tile.merged_into = Some(survivor);

        let survivor_tile = &mut self.tiles[survivor_idx];
        survivor_tile.matched = true;
        survivor_tile.grid = merged.clone();

        Ok(merged)
    }

    fn index_of(&self, id: TileId) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| DotMergeError::TileNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_board;
    use crate::tile::tiles_match;
    use crate::utils::seeded_rng;

    fn partners(board: &Board) -> (TileId, TileId) {
        let first = &board.tiles()[0];
        let partner = board
            .tiles()
            .iter()
            .find(|t| t.pair_key == first.pair_key && t.id != first.id)
            .unwrap();
        (first.id, partner.id)
    }

    #[test]
    fn test_lookup() {
        let board = generate_board(&mut seeded_rng("lookup"), 3, 4, 4).unwrap();
        let id = board.tiles()[2].id;
        assert_eq!(board.position(id), Some(2));
        assert_eq!(board.tile(id).map(|t| t.id), Some(id));
        assert_eq!(board.pair_count(), 3);
        assert_eq!(board.remaining_pairs(), 3);
        assert_eq!(board.visible_tiles().count(), 6);
    }

    #[test]
    fn test_resolve_pair() {
        let mut board = generate_board(&mut seeded_rng("resolve"), 3, 4, 4).unwrap();
        let (a, b) = partners(&board);
        assert!(tiles_match(board.tile(a).unwrap(), board.tile(b).unwrap()));

        let merged = board.resolve_pair(a, b).unwrap();
        assert!(merged.is_fully_colored());

        let survivor = board.tile(a).unwrap();
        assert!(survivor.matched);
        assert!(survivor.is_completed());
        assert_eq!(survivor.grid, merged);

        let absorbed = board.tile(b).unwrap();
        assert!(absorbed.matched);
        assert_eq!(absorbed.merged_into, Some(a));
        assert!(!absorbed.is_visible());

        assert_eq!(board.remaining_pairs(), 2);
        assert_eq!(board.visible_tiles().count(), 5);
        // absorbed tiles still count for their key
        assert!(board.pairs_are_consistent());
    }

    #[test]
    fn test_resolve_rejects_unknown_and_self() {
        let mut board = generate_board(&mut seeded_rng("reject"), 2, 4, 4).unwrap();
        let other = generate_board(&mut seeded_rng("other"), 1, 4, 4).unwrap();
        let a = board.tiles()[0].id;
        let stranger = other.tiles()[0].id;

        assert!(matches!(
            board.resolve_pair(a, stranger),
            Err(DotMergeError::TileNotFound(_))
        ));
        assert!(matches!(
            board.resolve_pair(a, a),
            Err(DotMergeError::InvalidOperation(_))
        ));
        assert_eq!(board.remaining_pairs(), 2);
    }

    #[test]
    fn test_inconsistent_pairs_detected() {
        let board = generate_board(&mut seeded_rng("broken"), 2, 2, 2).unwrap();
        let mut tiles = board.tiles().to_vec();
        tiles.pop();
        assert!(!Board::new(tiles).pairs_are_consistent());
    }
}
