use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{BOARD_SIZE, BOARD_WIDTH};
use crate::game::board::{Board, Cell};
use crate::game::piece::{Piece, Tetromino};
use crate::game::scoring::line_clear_points;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDirection {
    Left,
    Right,
}

/// State changes for whoever drives timers and draws the board.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Restarted,
    PieceSpawned(Tetromino),
    PieceFrozen { cells: Vec<usize> },
    LinesMarked { rows: Vec<usize> },
    LinesCleared { rows: Vec<usize> },
    ScoreChanged(u32),
    GameOver { score: u32 },
}

pub struct Game {
    pub board: Board,
    pub current_piece: Option<Piece>,
    pub score: u32,
    pub game_state: GameState,
    /// Full rows waiting for the deferred sweep, top to bottom.
    pub pending_rows: Vec<usize>,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            score: 0,
            game_state: GameState::Idle,
            pending_rows: Vec::new(),
            events: Vec::new(),
            rng,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle → Running. From GameOver this is a restart.
    pub fn start(&mut self) -> bool {
        match self.game_state {
            GameState::Idle => {
                log::debug!("game started");
                self.game_state = GameState::Running;
                self.events.push(GameEvent::Started);
                self.spawn(None);
                true
            }
            GameState::GameOver => {
                self.restart();
                true
            }
            GameState::Running | GameState::Paused => false,
        }
    }

    pub fn restart(&mut self) {
        log::debug!("game restarted");
        self.board = Board::new();
        self.current_piece = None;
        self.pending_rows.clear();
        self.score = 0;
        self.game_state = GameState::Running;
        self.events.push(GameEvent::Restarted);
        self.events.push(GameEvent::ScoreChanged(0));
        self.spawn(None);
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.game_state {
            GameState::Running => {
                self.game_state = GameState::Paused;
                self.events.push(GameEvent::Paused);
                true
            }
            GameState::Paused => {
                self.game_state = GameState::Running;
                self.events.push(GameEvent::Resumed);
                true
            }
            GameState::Idle | GameState::GameOver => false,
        }
    }

    /// True while moves, rotations, drops and ticks have any effect.
    pub fn accepts_input(&self) -> bool {
        self.game_state == GameState::Running && self.pending_rows.is_empty()
    }

    /// Places a new piece at the spawn anchor, random if no shape is given,
    /// then checks whether it was spawned into the stack.
    pub fn spawn(&mut self, kind: Option<Tetromino>) {
        let kind = kind.unwrap_or_else(|| {
            Tetromino::ALL[self.rng.gen_range(0..Tetromino::ALL.len())]
        });
        self.current_piece = Some(Piece::new(kind));
        self.events.push(GameEvent::PieceSpawned(kind));
        self.check_game_over();
    }

    pub fn check_game_over(&mut self) -> bool {
        if self.game_state == GameState::GameOver {
            return true;
        }
        let blocked = self
            .current_piece
            .map_or(false, |piece| piece.cells().iter().any(|&i| self.board.is_taken(i)));
        if blocked {
            log::debug!("piece blocked at spawn, final score {}", self.score);
            self.game_state = GameState::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
        }
        blocked
    }

    /// Every cell inside the grid, free, and not wrapped across a row edge.
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        let cells = piece.cells();
        let in_bounds = cells.iter().all(|&i| i >= 0 && (i as usize) < BOARD_SIZE);
        if !in_bounds || cells.iter().any(|&i| self.board.is_taken(i)) {
            return false;
        }
        let columns = cells.iter().map(|&i| Board::column(i as usize));
        let min = columns.clone().min().unwrap_or(0);
        let max = columns.max().unwrap_or(0);
        (max - min) as i32 == piece.column_span()
    }

    /// Something frozen, or the floor, sits directly below one of its cells.
    pub fn is_resting(&self, piece: &Piece) -> bool {
        piece.cells().iter().any(|&i| {
            let below = i + BOARD_WIDTH as i32;
            below >= BOARD_SIZE as i32 || self.board.is_taken(below)
        })
    }

    pub fn move_piece(&mut self, direction: MoveDirection) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.current_piece else {
            return false;
        };

        let (edge, delta) = match direction {
            MoveDirection::Left => (0, -1),
            MoveDirection::Right => (BOARD_WIDTH - 1, 1),
        };
        let blocked = piece.cells().iter().any(|&i| {
            Board::column(i as usize) == edge || self.board.is_taken(i + delta)
        });
        if blocked {
            return false;
        }

        self.current_piece = Some(piece.shifted(delta));
        true
    }

    /// Advances to the next rotation state if every cell of it is valid.
    /// No wall kicks: a blocked rotation leaves the piece untouched.
    pub fn rotate_piece(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.current_piece else {
            return false;
        };

        let rotated = piece.rotated();
        if !self.is_valid_position(&rotated) {
            return false;
        }
        self.current_piece = Some(rotated);
        true
    }

    /// Moves the piece down one row, then freezes it if it has landed.
    /// A piece that is already resting freezes where it is.
    pub fn soft_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(piece) = self.current_piece else {
            return false;
        };

        if self.is_resting(&piece) {
            self.lock_piece();
            return false;
        }
        self.current_piece = Some(piece.shifted(BOARD_WIDTH as i32));
        self.freeze();
        true
    }

    /// One gravity step.
    pub fn tick(&mut self) -> bool {
        self.soft_drop()
    }

    /// Drops the piece as far as it goes and freezes it. Returns the number
    /// of rows travelled.
    pub fn hard_drop(&mut self) -> usize {
        if !self.accepts_input() {
            return 0;
        }
        let Some(landing) = self.landing_piece() else {
            return 0;
        };
        let rows = self
            .current_piece
            .map_or(0, |piece| ((landing.anchor - piece.anchor) / BOARD_WIDTH as i32) as usize);
        self.current_piece = Some(landing);
        self.lock_piece();
        rows
    }

    /// Where a hard drop would leave the current piece.
    pub fn landing_piece(&self) -> Option<Piece> {
        let mut piece = self.current_piece?;
        while !self.is_resting(&piece) {
            piece = piece.shifted(BOARD_WIDTH as i32);
        }
        Some(piece)
    }

    /// Freezes the piece if it has landed.
    pub fn freeze(&mut self) -> bool {
        match self.current_piece {
            Some(piece) if self.is_resting(&piece) => {
                self.lock_piece();
                true
            }
            _ => false,
        }
    }

    /// Turns the current piece into permanent cells wherever it is, marks
    /// completed rows and spawns the next piece.
    pub fn lock_piece(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        let frozen: Vec<usize> = piece
            .cells()
            .iter()
            .filter_map(|&i| usize::try_from(i).ok())
            .collect();
        for &i in &frozen {
            self.board.set(i, Cell::Taken(piece.kind));
        }
        log::debug!("{:?} frozen at {:?}", piece.kind, frozen);
        self.events.push(GameEvent::PieceFrozen { cells: frozen });

        self.clear_lines();
        self.spawn(None);
    }

    /// Marks newly completed rows for the deferred sweep and scores them.
    pub fn clear_lines(&mut self) -> Vec<usize> {
        let rows: Vec<usize> = self
            .board
            .full_rows()
            .into_iter()
            .filter(|row| !self.pending_rows.contains(row))
            .collect();
        if rows.is_empty() {
            return rows;
        }

        self.pending_rows.extend_from_slice(&rows);
        self.pending_rows.sort_unstable();
        self.score += line_clear_points(rows.len());
        log::debug!("rows {:?} complete, score {}", rows, self.score);
        self.events.push(GameEvent::LinesMarked { rows: rows.clone() });
        self.events.push(GameEvent::ScoreChanged(self.score));
        rows
    }

    /// Empties the marked rows and compacts the stack above them.
    pub fn sweep_lines(&mut self) -> usize {
        if self.pending_rows.is_empty() {
            return 0;
        }
        let rows = std::mem::take(&mut self.pending_rows);
        let cleared = self.board.clear_rows(&rows);
        self.events.push(GameEvent::LinesCleared { rows });

        // Compaction may have pushed frozen cells into the waiting piece
        if matches!(self.game_state, GameState::Running | GameState::Paused) {
            self.check_game_over();
        }
        cleared
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.pending_rows.contains(&Board::row_of(index))
    }
}
