pub mod board;
pub mod piece;
pub mod scoring;
pub mod session;
pub mod state;
pub mod timer;

pub use board::{Board, Cell};
pub use piece::{Piece, Tetromino};
pub use session::{Command, Session};
pub use state::{Game, GameEvent, GameState, MoveDirection};
