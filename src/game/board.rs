use std::ops::Index;

use crate::constants::{BOARD_HEIGHT, BOARD_SIZE, BOARD_WIDTH};
use crate::game::piece::Tetromino;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Taken(Tetromino),
}

impl Cell {
    pub fn is_taken(self) -> bool {
        matches!(self, Cell::Taken(_))
    }
}

/// Fixed-size flat grid, row-major from the top-left corner.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    pub fn column(index: usize) -> usize {
        index % BOARD_WIDTH
    }

    pub fn row_of(index: usize) -> usize {
        index / BOARD_WIDTH
    }

    /// Out-of-range indices read as free.
    pub fn is_taken(&self, index: i32) -> bool {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.cells.get(i))
            .map_or(false, |cell| cell.is_taken())
    }

    pub fn set(&mut self, index: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * BOARD_WIDTH;
        &self.cells[start..start + BOARD_WIDTH]
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|cell| cell.is_taken())
    }

    pub fn full_rows(&self) -> Vec<usize> {
        (0..BOARD_HEIGHT).filter(|&row| self.is_row_full(row)).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_taken()).count()
    }

    /// Removes the given rows and drops everything above them down to fill
    /// the gap. Returns how many rows were removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let mut cleared = 0;
        let mut write_row = BOARD_HEIGHT;

        // Walk bottom-up, copying surviving rows down past the removed ones
        for read_row in (0..BOARD_HEIGHT).rev() {
            if rows.contains(&read_row) {
                cleared += 1;
                continue;
            }
            write_row -= 1;
            if read_row != write_row {
                let src = read_row * BOARD_WIDTH;
                self.cells.copy_within(src..src + BOARD_WIDTH, write_row * BOARD_WIDTH);
            }
        }

        for cell in &mut self.cells[..write_row * BOARD_WIDTH] {
            *cell = Cell::Empty;
        }

        cleared
    }
}

impl Index<usize> for Board {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.cells[index]
    }
}
