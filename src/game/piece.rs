use ratatui::style::Color;
use crate::constants::{BOARD_WIDTH, SPAWN_ANCHOR};

/// Local `(row, col)` offsets of the four cells of one rotation state.
pub type Shape = [(u8, u8); 4];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tetromino {
    I, O, T, S, Z, J, L
}

const I_ROTATIONS: &[Shape] = &[
    [(0, 1), (1, 1), (2, 1), (3, 1)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const O_ROTATIONS: &[Shape] = &[
    [(0, 0), (0, 1), (1, 0), (1, 1)],
];

const T_ROTATIONS: &[Shape] = &[
    [(0, 1), (1, 0), (1, 1), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (2, 0)],
    [(0, 0), (0, 1), (0, 2), (1, 1)],
    [(0, 1), (1, 0), (1, 1), (2, 1)],
];

const S_ROTATIONS: &[Shape] = &[
    [(0, 1), (0, 2), (1, 0), (1, 1)],
    [(0, 0), (1, 0), (1, 1), (2, 1)],
];

const Z_ROTATIONS: &[Shape] = &[
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    [(0, 1), (1, 0), (1, 1), (2, 0)],
];

const J_ROTATIONS: &[Shape] = &[
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(0, 0), (0, 1), (1, 0), (2, 0)],
    [(0, 0), (0, 1), (0, 2), (1, 2)],
    [(0, 1), (1, 1), (2, 0), (2, 1)],
];

const L_ROTATIONS: &[Shape] = &[
    [(0, 2), (1, 0), (1, 1), (1, 2)],
    [(0, 0), (1, 0), (2, 0), (2, 1)],
    [(0, 0), (0, 1), (0, 2), (1, 0)],
    [(0, 0), (0, 1), (1, 1), (2, 1)],
];

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I, Tetromino::O, Tetromino::T,
        Tetromino::S, Tetromino::Z, Tetromino::J, Tetromino::L,
    ];

    pub fn rotations(self) -> &'static [Shape] {
        match self {
            Tetromino::I => I_ROTATIONS,
            Tetromino::O => O_ROTATIONS,
            Tetromino::T => T_ROTATIONS,
            Tetromino::S => S_ROTATIONS,
            Tetromino::Z => Z_ROTATIONS,
            Tetromino::J => J_ROTATIONS,
            Tetromino::L => L_ROTATIONS,
        }
    }

    pub fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    pub fn color(self) -> Color {
        match self {
            Tetromino::I => Color::Cyan,
            Tetromino::O => Color::Yellow,
            Tetromino::T => Color::Magenta,
            Tetromino::S => Color::Green,
            Tetromino::Z => Color::Red,
            Tetromino::J => Color::Blue,
            Tetromino::L => Color::LightYellow,
        }
    }
}

/// The falling piece. `anchor` is a flat grid index and may sit one cell
/// before its row when the shape's leftmost local column is empty.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: Tetromino,
    pub rotation: usize,
    pub anchor: i32,
}

impl Piece {
    pub fn new(kind: Tetromino) -> Self {
        Self {
            kind,
            rotation: 0,
            anchor: SPAWN_ANCHOR,
        }
    }

    pub fn shape(&self) -> &'static Shape {
        &self.kind.rotations()[self.rotation]
    }

    /// Flat indices of the four cells. Not bounds-checked.
    pub fn cells(&self) -> [i32; 4] {
        let shape = self.shape();
        let mut cells = [0; 4];
        for (cell, &(row, col)) in cells.iter_mut().zip(shape.iter()) {
            *cell = self.anchor + row as i32 * BOARD_WIDTH as i32 + col as i32;
        }
        cells
    }

    /// Width of the shape in columns, minus one.
    pub fn column_span(&self) -> i32 {
        let shape = self.shape();
        let min = shape.iter().map(|&(_, col)| col).min().unwrap_or(0);
        let max = shape.iter().map(|&(_, col)| col).max().unwrap_or(0);
        (max - min) as i32
    }

    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.kind.rotation_count(),
            ..*self
        }
    }

    pub fn shifted(&self, delta: i32) -> Self {
        Self {
            anchor: self.anchor + delta,
            ..*self
        }
    }
}
