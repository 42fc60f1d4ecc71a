use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};

use crate::{BoardError, Tile};

/// Smallest and largest board side; each row and column is addressed by one letter.
pub const MIN_SIDE: u8 = 2;
pub const MAX_SIDE: u8 = 26;

/// `(row, column)` offsets of the eight surrounding tiles.
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The minefield: a row-major grid of packed tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    mines: u16,
    tiles: Vec<Tile>,
}

impl Board {
    /// Generates a board with exactly `mines` mines placed from `seed`.
    ///
    /// The same seed always produces the same board. Mines are placed by
    /// rejection sampling, so `mines` must leave at least one safe tile.
    pub fn generate(rows: u8, columns: u8, mines: u16, seed: u64) -> Result<Self, BoardError> {
        let mut board = Self::empty(columns, rows)?;
        if mines >= board.area() {
            return Err(BoardError::TooManyMines {
                mines,
                area: board.area(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut placed = 0;
        while placed < mines {
            let row = rng.random_range(0..rows);
            let column = rng.random_range(0..columns);
            let index = board.index(row, column);
            if !board.tiles[index].is_mine() {
                board.tiles[index].set_mine();
                placed += 1;
            }
        }
        board.mines = placed;
        board.compute_adjacency();

        debug!(rows, columns, mines, seed, "Generated board");
        Ok(board)
    }

    /// Builds a board with mines at exactly the given `(row, column)` positions.
    pub fn from_mine_coords(rows: u8, columns: u8, mines: &[(u8, u8)]) -> Result<Self, BoardError> {
        let mut board = Self::empty(columns, rows)?;
        for &(row, column) in mines {
            if !board.contains(row, column) {
                return Err(BoardError::OutOfBounds { row, column });
            }
            let index = board.index(row, column);
            board.tiles[index].set_mine();
        }
        board.mines = board.count_mines();
        board.compute_adjacency();
        Ok(board)
    }

    /// Rebuilds a board from raw tiles, e.g. after decoding a state token.
    ///
    /// Tiles are taken as-is; the adjacency counts they carry are not recomputed.
    pub fn from_tiles(width: u8, height: u8, tiles: Vec<Tile>) -> Result<Self, BoardError> {
        let mut board = Self::empty(width, height)?;
        if tiles.len() != board.tiles.len() {
            return Err(BoardError::TileCountMismatch {
                expected: board.tiles.len(),
                actual: tiles.len(),
            });
        }
        board.tiles = tiles;
        board.mines = board.count_mines();
        Ok(board)
    }

    fn empty(width: u8, height: u8) -> Result<Self, BoardError> {
        let valid = MIN_SIDE..=MAX_SIDE;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            mines: 0,
            tiles: vec![Tile::default(); usize::from(width) * usize::from(height)],
        })
    }

    fn compute_adjacency(&mut self) {
        for row in 0..self.height {
            for column in 0..self.width {
                let index = self.index(row, column);
                if self.tiles[index].is_mine() {
                    continue;
                }
                let count = self.count_adjacent_mines(row, column);
                self.tiles[index].set_adjacent_mines(count);
            }
        }
        trace!(mines = self.mines, "Computed adjacency counts");
    }

    fn count_mines(&self) -> u16 {
        // at most 26 * 26 tiles
        self.tiles.iter().filter(|tile| tile.is_mine()).count() as u16
    }

    fn index(&self, row: u8, column: u8) -> usize {
        usize::from(row) * usize::from(self.width) + usize::from(column)
    }

    /// Number of columns.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn area(&self) -> u16 {
        u16::from(self.width) * u16::from(self.height)
    }

    /// Mines on the board, fixed when the board was built.
    pub fn mines(&self) -> u16 {
        self.mines
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn contains(&self, row: u8, column: u8) -> bool {
        row < self.height && column < self.width
    }

    /// Bounds check on signed coordinates, for callers that step off the edge.
    pub fn is_in_bounds(&self, row: isize, column: isize) -> bool {
        row >= 0 && column >= 0 && row < self.height as isize && column < self.width as isize
    }

    /// The tile at `(row, column)`, if it is on the board.
    pub fn tile(&self, row: u8, column: u8) -> Option<Tile> {
        self.contains(row, column)
            .then(|| self.tiles[self.index(row, column)])
    }

    pub fn is_mine(&self, row: u8, column: u8) -> bool {
        self.tile(row, column).is_some_and(Tile::is_mine)
    }

    pub fn is_flagged(&self, row: u8, column: u8) -> bool {
        self.tile(row, column).is_some_and(Tile::is_flagged)
    }

    pub fn is_shown(&self, row: u8, column: u8) -> bool {
        self.tile(row, column).is_some_and(Tile::is_shown)
    }

    pub fn adjacent_mine_count(&self, row: u8, column: u8) -> u8 {
        self.tile(row, column).map_or(0, Tile::adjacent_mines)
    }

    pub fn has_adjacent_mines(&self, row: u8, column: u8) -> bool {
        self.adjacent_mine_count(row, column) > 0
    }

    /// The in-bounds neighbors of `(row, column)`: eight in the interior, fewer
    /// along edges and in corners.
    pub fn neighbors(&self, row: u8, column: u8) -> impl Iterator<Item = (u8, u8)> + use<> {
        let (height, width) = (self.height, self.width);
        DISPLACEMENTS.into_iter().filter_map(move |(dr, dc)| {
            let next_row = row.checked_add_signed(dr)?;
            let next_column = column.checked_add_signed(dc)?;
            (next_row < height && next_column < width).then_some((next_row, next_column))
        })
    }

    /// Counts mines among the neighbors by scanning them.
    pub fn count_adjacent_mines(&self, row: u8, column: u8) -> u8 {
        self.neighbors(row, column)
            .filter(|&(r, c)| self.is_mine(r, c))
            .count() as u8
    }

    pub fn count_adjacent_flags(&self, row: u8, column: u8) -> u8 {
        self.neighbors(row, column)
            .filter(|&(r, c)| self.is_flagged(r, c))
            .count() as u8
    }

    pub(crate) fn tile_mut(&mut self, row: u8, column: u8) -> Option<&mut Tile> {
        if self.contains(row, column) {
            let index = self.index(row, column);
            Some(&mut self.tiles[index])
        } else {
            None
        }
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_places_exact_mine_count() {
        for seed in 0..20 {
            let board = Board::generate(9, 9, 10, seed).unwrap();
            let mines = board.tiles().iter().filter(|tile| tile.is_mine()).count();

            assert_eq!(mines, 10);
            assert_eq!(board.mines(), 10);
            assert_eq!(board.area(), 81);
        }
    }

    #[test]
    fn generate_stores_true_adjacency() {
        let board = Board::generate(12, 7, 30, 42).unwrap();

        for row in 0..board.height() {
            for column in 0..board.width() {
                if board.is_mine(row, column) {
                    continue;
                }
                let mut expected = 0;
                for dr in -1..=1_isize {
                    for dc in -1..=1_isize {
                        let (r, c) = (row as isize + dr, column as isize + dc);
                        if (dr, dc) != (0, 0)
                            && board.is_in_bounds(r, c)
                            && board.is_mine(r as u8, c as u8)
                        {
                            expected += 1;
                        }
                    }
                }
                assert_eq!(board.adjacent_mine_count(row, column), expected);
            }
        }
    }

    #[test]
    fn generate_is_deterministic_per_seed() {
        let first = Board::generate(16, 16, 40, 7).unwrap();
        let second = Board::generate(16, 16, 40, 7).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn generate_fills_all_but_one_tile() {
        let board = Board::generate(2, 2, 3, 1).unwrap();

        let safe: Vec<_> = board.tiles().iter().filter(|tile| !tile.is_mine()).collect();
        assert_eq!(safe.len(), 1);
        assert_eq!(safe[0].adjacent_mines(), 3);
    }

    #[test]
    fn generate_rejects_full_board() {
        assert_eq!(
            Board::generate(3, 3, 9, 0),
            Err(BoardError::TooManyMines { mines: 9, area: 9 })
        );
    }

    #[test]
    fn rows_and_columns_are_not_swapped() {
        let board = Board::generate(3, 5, 1, 0).unwrap();

        assert_eq!(board.height(), 3);
        assert_eq!(board.width(), 5);
        assert!(board.contains(2, 4));
        assert!(!board.contains(4, 2));
    }

    #[test]
    fn neighbors_respect_edges() {
        let board = Board::from_mine_coords(4, 4, &[]).unwrap();

        assert_eq!(board.neighbors(0, 0).count(), 3);
        assert_eq!(board.neighbors(0, 2).count(), 5);
        assert_eq!(board.neighbors(2, 2).count(), 8);
        assert_eq!(board.neighbors(3, 3).count(), 3);
    }

    #[test]
    fn from_tiles_checks_shape() {
        assert_eq!(
            Board::from_tiles(3, 3, vec![Tile::default(); 8]),
            Err(BoardError::TileCountMismatch {
                expected: 9,
                actual: 8
            })
        );
        assert_eq!(
            Board::from_tiles(1, 3, vec![Tile::default(); 3]),
            Err(BoardError::InvalidDimensions {
                width: 1,
                height: 3
            })
        );
    }

    #[test]
    fn from_mine_coords_rejects_outside_positions() {
        assert_eq!(
            Board::from_mine_coords(3, 3, &[(3, 0)]),
            Err(BoardError::OutOfBounds { row: 3, column: 0 })
        );
    }
}
