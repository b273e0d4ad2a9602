// Dot grids for DotMerge tiles
//
// A grid is a rows x cols matrix of cells stored row-major. Every cell is
// either grey or carries one of the eight palette colors.

use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::types::{DotMergeError, Result};

/// Palette of dot colors (names match the CSS classes of the UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Purple,
    Orange,
    Green,
    Pink,
    Cyan,
}

pub const PALETTE: [Color; 8] = [
    Color::Red,
    Color::Blue,
    Color::Yellow,
    Color::Purple,
    Color::Orange,
    Color::Green,
    Color::Pink,
    Color::Cyan,
];

impl Color {
    /// Draw a palette color uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        PALETTE[rng.gen_range(0..PALETTE.len())]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
            Color::Green => "green",
            Color::Pink => "pink",
            Color::Cyan => "cyan",
        }
    }
}

/// A single dot of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Cell {
    Grey,
    Colored(Color),
}

impl Cell {
    pub fn is_grey(self) -> bool {
        matches!(self, Cell::Grey)
    }

    pub fn is_colored(self) -> bool {
        !self.is_grey()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cell::Grey => "grey",
            Cell::Colored(color) => color.as_str(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cell {
    type Err = DotMergeError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "grey" {
            return Ok(Cell::Grey);
        }
        PALETTE
            .iter()
            .find(|c| c.as_str() == s)
            .map(|&c| Cell::Colored(c))
            .ok_or_else(|| DotMergeError::InvalidGrid(format!("Unknown cell state: {}", s)))
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> String {
        cell.as_str().to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = DotMergeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Rectangular grid of cells
///
/// Serialized as an array of rows, which is what the renderer iterates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from row-major cells
    pub fn new(rows: usize, cols: usize, cells: Vec<Cell>) -> Result<Grid> {
        if rows == 0 || cols == 0 {
            return Err(DotMergeError::InvalidGrid(format!(
                "Grid must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(DotMergeError::InvalidGrid(format!(
                "Expected {}x{} cells, got {}",
                rows,
                cols,
                cells.len()
            )));
        }
        Ok(Grid { rows, cols, cells })
    }

    /// Build a grid from nested rows (must be rectangular)
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Grid> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(DotMergeError::InvalidGrid("Rows have different lengths".to_string()));
        }
        Grid::new(height, width, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Iterate rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols)
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    pub fn grey_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_grey()).count()
    }

    pub fn is_fully_colored(&self) -> bool {
        self.cells.iter().all(|c| c.is_colored())
    }

    /// True when both grids have the same shape and every coordinate is
    /// grey on exactly one side
    pub fn is_complementary(&self, other: &Grid) -> bool {
        self.same_shape(other)
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.is_grey() != b.is_grey())
    }

    /// Overlay two grids, keeping the colored cell at every coordinate.
    ///
    /// Only meaningful for complementary grids; the shapes must agree.
    pub fn merged_with(&self, other: &Grid) -> Grid {
        debug_assert!(self.same_shape(other), "merging grids of different shapes");
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(&a, &b)| if a.is_colored() { a } else { b })
            .collect();
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = DotMergeError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter_rows())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            let line: Vec<&str> = row.iter().map(|c| c.as_str()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
