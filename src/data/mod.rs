use minesweeper_common::models::{Cell, CellStatus};

use crate::error::{GameError, Result};

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The minefield: a dense row-major grid of cells, `index = row * cols + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    mine_count: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Builds a board from a row-major mine mask and fills in neighbor counts.
    pub(crate) fn from_mine_mask(rows: usize, cols: usize, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), rows * cols);

        let cells = (0..rows * cols)
            .map(|index| Cell {
                is_mine: mask[index],
                ..Cell::new(index / cols, index % cols)
            })
            .collect();
        let mut board = Self {
            rows,
            cols,
            mine_count: mask.iter().filter(|&&mine| mine).count(),
            cells,
        };

        for index in 0..board.cells.len() {
            if !board.cells[index].is_mine {
                board.cells[index].neighbor_mines = board.count_adjacent_mines(index);
            }
        }

        board
    }

    /// Builds a board with mines at exactly the given `(row, col)` positions.
    pub fn from_mines(rows: usize, cols: usize, mines: &[(usize, usize)]) -> Result<Self> {
        let total = checked_total(rows, cols)?;
        let mut mask = vec![false; total];

        for &(row, col) in mines {
            if row >= rows || col >= cols {
                return Err(GameError::InvalidCoords { row, col });
            }
            mask[row * cols + col] = true;
        }

        Ok(Self::from_mine_mask(rows, cols, &mask))
    }

    /// Rebuilds a board from a persisted cell sequence, rejecting any sequence
    /// that breaks the board invariants.
    pub fn from_cells(rows: usize, cols: usize, mine_count: usize, cells: Vec<Cell>) -> Result<Self> {
        let total = checked_total(rows, cols)
            .map_err(|err| GameError::CorruptSnapshot(err.to_string()))?;

        if cells.len() != total {
            return Err(GameError::CorruptSnapshot(format!(
                "expected {total} cells, found {}",
                cells.len()
            )));
        }

        for (index, cell) in cells.iter().enumerate() {
            if cell.row != index / cols || cell.col != index % cols {
                return Err(GameError::CorruptSnapshot(format!(
                    "cell {index} claims position ({}, {})",
                    cell.row, cell.col
                )));
            }
        }

        let board = Self {
            rows,
            cols,
            mine_count,
            cells,
        };

        let actual_mines = board.cells.iter().filter(|cell| cell.is_mine).count();
        if actual_mines != mine_count || mine_count == 0 || mine_count >= total {
            return Err(GameError::CorruptSnapshot(format!(
                "declared {mine_count} mines, found {actual_mines} on {total} cells"
            )));
        }

        for (index, cell) in board.cells.iter().enumerate() {
            if !cell.is_mine && cell.neighbor_mines != board.count_adjacent_mines(index) {
                return Err(GameError::CorruptSnapshot(format!(
                    "cell {index} has wrong neighbor count {}",
                    cell.neighbor_mines
                )));
            }
        }

        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
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

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// In-bounds neighbors of `index`, at most eight.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        let (row, col) = (index / cols, index % cols);

        DISPLACEMENTS.into_iter().filter_map(move |(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < rows && c < cols).then_some(r * cols + c)
        })
    }

    pub fn count_adjacent_mines(&self, index: usize) -> u8 {
        self.neighbors(index)
            .filter(|&neighbor| self.cells[neighbor].is_mine)
            .count() as u8
    }

    pub fn safe_cell_count(&self) -> usize {
        self.cells.len() - self.mine_count
    }

    pub fn revealed_safe_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| !cell.is_mine && cell.is_revealed())
            .count()
    }

    pub fn flagged_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_flagged()).count()
    }

    pub fn count_with_status(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|cell| cell.status == status).count()
    }

    /// True once every safe cell is revealed.
    pub fn is_complete(&self) -> bool {
        self.revealed_safe_count() == self.safe_cell_count()
    }
}

fn checked_total(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(GameError::InvalidDimensions { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(GameError::InvalidDimensions { rows, cols })
}
