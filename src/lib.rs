//! # blockfall
//!
//! A falling-block puzzle game. The engine in [`game`] is headless: it owns
//! the grid, the falling piece and the score, and reports what changed as
//! [`game::GameEvent`]s. [`game::Session`] drives it with explicit timers;
//! [`ui`] and [`input`] adapt it to a terminal.

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod input;
pub mod storage;
pub mod ui;
