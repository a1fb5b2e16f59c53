use std::time::{Duration, Instant};

use blockfall::config::TimingConfig;
use blockfall::constants::{BOARD_SIZE, BOARD_WIDTH};
use blockfall::game::{Cell, Command, Game, GameState, Piece, Session, Tetromino};
use blockfall::storage::{HighScoreStore, JsonFileStore, MemoryStore};

const MS: Duration = Duration::from_millis(1);

fn session_with(timing: TimingConfig, store: Box<dyn HighScoreStore>) -> Session {
    Session::new(Game::with_seed(42), timing, store)
}

fn started(timing: TimingConfig) -> (Session, Instant) {
    let t0 = Instant::now();
    let mut session = session_with(timing, Box::new(MemoryStore::default()));
    session.handle(Command::Start, t0);
    (session, t0)
}

fn fill_bottom_row_except_first_column(session: &mut Session) {
    for i in BOARD_SIZE - BOARD_WIDTH + 1..BOARD_SIZE {
        session.game.board.set(i, Cell::Taken(Tetromino::O));
    }
}

/// Every shape's first rotation touches row 0 in columns 4..=6, so walling
/// those off makes the next spawn collide.
fn end_run_with_blocked_spawn(session: &mut Session, now: Instant) {
    for i in 4..=6 {
        session.game.board.set(i, Cell::Taken(Tetromino::T));
    }
    session.game.current_piece = Some(Piece::new(Tetromino::O).shifted(170));
    session.handle(Command::HardDrop, now);
}

#[test]
fn gravity_moves_the_piece_once_per_interval() {
    let (mut session, t0) = started(TimingConfig::default());
    let anchor = session.game.current_piece.unwrap().anchor;

    session.update(t0 + 999 * MS);
    assert_eq!(session.game.current_piece.unwrap().anchor, anchor);

    session.update(t0 + 1000 * MS);
    assert_eq!(
        session.game.current_piece.unwrap().anchor,
        anchor + BOARD_WIDTH as i32
    );
}

#[test]
fn paused_game_ignores_the_clock() {
    let (mut session, t0) = started(TimingConfig::default());
    let before = session.game.current_piece.unwrap();

    session.handle(Command::TogglePause, t0);
    session.update(t0 + 5000 * MS);
    session.handle(Command::MoveLeft, t0 + 5000 * MS);
    assert_eq!(session.game.current_piece.unwrap(), before);

    session.handle(Command::TogglePause, t0 + 5000 * MS);
    session.update(t0 + 6000 * MS);
    assert_eq!(
        session.game.current_piece.unwrap().anchor,
        before.anchor + BOARD_WIDTH as i32
    );
}

#[test]
fn completed_row_is_swept_after_the_delay() {
    let (mut session, t0) = started(TimingConfig::default());
    fill_bottom_row_except_first_column(&mut session);
    session.game.current_piece = Some(Piece::new(Tetromino::I));
    for _ in 0..5 {
        session.handle(Command::MoveLeft, t0);
    }
    session.handle(Command::HardDrop, t0);

    assert_eq!(session.game.score, 100);
    assert_eq!(session.game.pending_rows, vec![19]);
    let marked = session.game.board.occupied_count();

    session.update(t0 + 999 * MS);
    assert_eq!(session.game.pending_rows, vec![19]);

    session.update(t0 + 1000 * MS);
    assert!(session.game.pending_rows.is_empty());
    assert_eq!(session.game.board.occupied_count(), marked - BOARD_WIDTH);
    // Rows 16..=18 of the I column moved down one row
    assert!(session.game.board[19 * BOARD_WIDTH].is_taken());
    assert!(!session.game.board[16 * BOARD_WIDTH].is_taken());
}

#[test]
fn zero_delay_sweeps_immediately() {
    let timing = TimingConfig {
        line_clear_delay_ms: 0,
        ..TimingConfig::default()
    };
    let (mut session, t0) = started(timing);
    fill_bottom_row_except_first_column(&mut session);
    session.game.current_piece = Some(Piece::new(Tetromino::I));
    for _ in 0..5 {
        session.handle(Command::MoveLeft, t0);
    }
    session.handle(Command::HardDrop, t0);

    assert!(session.game.pending_rows.is_empty());
    assert_eq!(session.game.board.occupied_count(), 3);
    assert!(session.game.accepts_input());
}

#[test]
fn scoring_speeds_up_gravity() {
    let timing = TimingConfig {
        speedup_score_step: 100,
        line_clear_delay_ms: 0,
        ..TimingConfig::default()
    };
    let (mut session, t0) = started(timing);
    fill_bottom_row_except_first_column(&mut session);
    session.game.current_piece = Some(Piece::new(Tetromino::I));
    for _ in 0..5 {
        session.handle(Command::MoveLeft, t0);
    }
    session.handle(Command::HardDrop, t0);

    assert_eq!(session.drop_interval(), Duration::from_millis(900));
}

#[test]
fn blocked_spawn_ends_the_run_and_stops_the_timer() {
    let (mut session, t0) = started(TimingConfig::default());
    end_run_with_blocked_spawn(&mut session, t0);

    assert_eq!(session.game.game_state, GameState::GameOver);
    assert!(!session.is_dropping());

    let frozen = session.game.board.clone();
    session.update(t0 + 10_000 * MS);
    assert_eq!(session.game.board, frozen);
}

#[test]
fn beating_the_high_score_persists_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.json");
    JsonFileStore::new(&path).save(50).unwrap();

    let t0 = Instant::now();
    let mut session = session_with(TimingConfig::default(), Box::new(JsonFileStore::new(&path)));
    assert_eq!(session.high_score(), 50);
    session.handle(Command::Start, t0);

    session.game.score = 300;
    end_run_with_blocked_spawn(&mut session, t0);

    assert_eq!(session.game.game_state, GameState::GameOver);
    assert!(session.is_new_high_score());
    assert_eq!(session.high_score(), 300);
    assert_eq!(JsonFileStore::new(&path).load().unwrap(), 300);
}

#[test]
fn lower_score_keeps_the_old_record() {
    let t0 = Instant::now();
    let mut session = session_with(TimingConfig::default(), Box::new(MemoryStore::new(1000)));
    session.handle(Command::Start, t0);
    end_run_with_blocked_spawn(&mut session, t0);

    assert_eq!(session.game.game_state, GameState::GameOver);
    assert!(!session.is_new_high_score());
    assert_eq!(session.high_score(), 1000);
}

#[test]
fn restart_after_game_over_resumes_play() {
    let (mut session, t0) = started(TimingConfig::default());
    end_run_with_blocked_spawn(&mut session, t0);
    assert!(!session.is_dropping());

    session.handle(Command::Restart, t0 + 100 * MS);
    assert_eq!(session.game.game_state, GameState::Running);
    assert_eq!(session.game.score, 0);
    assert_eq!(session.game.board.occupied_count(), 0);
    assert!(session.is_dropping());
    assert_eq!(session.drop_interval(), Duration::from_millis(1000));
}

#[test]
fn corrupt_high_score_file_starts_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.json");
    std::fs::write(&path, "{garbage").unwrap();

    let t0 = Instant::now();
    let mut session = session_with(TimingConfig::default(), Box::new(JsonFileStore::new(&path)));
    assert_eq!(session.high_score(), 0);

    session.handle(Command::Start, t0);
    assert_eq!(session.game.game_state, GameState::Running);

    // The next record overwrites the broken file
    session.game.score = 200;
    end_run_with_blocked_spawn(&mut session, t0);
    assert_eq!(JsonFileStore::new(&path).load().unwrap(), 200);
}

#[test]
fn rows_marked_on_the_last_lock_are_still_swept() {
    let (mut session, t0) = started(TimingConfig::default());
    fill_bottom_row_except_first_column(&mut session);
    for i in 4..=6 {
        session.game.board.set(i, Cell::Taken(Tetromino::T));
    }
    session.game.current_piece = Some(Piece::new(Tetromino::I).shifted(100));
    for _ in 0..5 {
        session.handle(Command::MoveLeft, t0);
    }
    session.handle(Command::HardDrop, t0);

    assert_eq!(session.game.game_state, GameState::GameOver);
    assert_eq!(session.game.pending_rows, vec![19]);
    assert_eq!(session.high_score(), 100);

    session.update(t0 + 1000 * MS);
    assert!(session.game.pending_rows.is_empty());
    assert_eq!(session.game.game_state, GameState::GameOver);
    // Three I cells plus the shifted top-row wall remain
    assert_eq!(session.game.board.occupied_count(), 6);
    assert!(session.game.board[19 * BOARD_WIDTH].is_taken());
    assert!(session.game.board[BOARD_WIDTH + 4].is_taken());
}
