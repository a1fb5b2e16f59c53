use std::time::{Duration, Instant};

use crate::config::TimingConfig;
use crate::game::scoring::drop_interval;
use crate::game::state::{Game, GameEvent, GameState, MoveDirection};
use crate::game::timer::{Delay, Ticker};
use crate::storage::HighScoreStore;

/// Player-facing actions, independent of how they were entered.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    HardDrop,
    Start,
    TogglePause,
    Restart,
    Quit,
}

/// Owns a `Game` together with the timers that drive it and the high-score
/// store it reports to. Every engine event is handled before control
/// returns to the caller.
pub struct Session {
    pub game: Game,
    timing: TimingConfig,
    drop_timer: Ticker,
    clear_timer: Delay,
    store: Box<dyn HighScoreStore>,
    high_score: u32,
    new_high_score: bool,
}

impl Session {
    pub fn new(
        game: Game,
        timing: TimingConfig,
        store: Box<dyn HighScoreStore>,
    ) -> Self {
        // An unreadable record counts as no record
        let high_score = store.load().unwrap_or_else(|e| {
            log::warn!("could not load high score, starting from 0: {}", e);
            0
        });
        log::info!("session ready, high score {}", high_score);
        Self {
            drop_timer: Ticker::new(drop_interval(game.score, &timing)),
            game,
            timing,
            clear_timer: Delay::new(),
            store,
            high_score,
            new_high_score: false,
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// True once the finished run has beaten the previous best.
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn drop_interval(&self) -> Duration {
        self.drop_timer.interval()
    }

    pub fn is_dropping(&self) -> bool {
        self.drop_timer.is_active()
    }

    /// Applies a command. Returns false when the player asked to quit.
    pub fn handle(&mut self, command: Command, now: Instant) -> bool {
        match command {
            Command::MoveLeft => {
                self.game.move_piece(MoveDirection::Left);
            }
            Command::MoveRight => {
                self.game.move_piece(MoveDirection::Right);
            }
            Command::Rotate => {
                self.game.rotate_piece();
            }
            Command::SoftDrop => {
                self.game.soft_drop();
            }
            Command::HardDrop => {
                self.game.hard_drop();
            }
            Command::Start => {
                self.game.start();
            }
            Command::TogglePause => {
                self.game.toggle_pause();
            }
            Command::Restart => {
                if self.game.game_state != GameState::Idle {
                    self.game.restart();
                } else {
                    self.game.start();
                }
            }
            Command::Quit => return false,
        }
        self.process_events(now);
        true
    }

    /// Fires whatever timers are due.
    pub fn update(&mut self, now: Instant) {
        if self.clear_timer.poll(now) {
            self.game.sweep_lines();
        }
        if self.drop_timer.poll(now) {
            self.game.tick();
        }
        self.process_events(now);
    }

    fn process_events(&mut self, now: Instant) {
        loop {
            let events = self.game.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.on_event(event, now);
            }
        }
    }

    fn on_event(&mut self, event: GameEvent, now: Instant) {
        match event {
            GameEvent::Started | GameEvent::Resumed => {
                self.drop_timer.start(now);
            }
            GameEvent::Restarted => {
                self.clear_timer.cancel();
                self.new_high_score = false;
                self.drop_timer.start(now);
            }
            GameEvent::Paused => {
                self.drop_timer.cancel();
            }
            GameEvent::ScoreChanged(score) => {
                let interval = drop_interval(score, &self.timing);
                if interval != self.drop_timer.interval() {
                    log::debug!("drop interval now {:?}", interval);
                }
                self.drop_timer.set_interval(interval, now);
            }
            GameEvent::LinesMarked { rows } => {
                let delay = self.timing.line_clear_delay();
                if delay.is_zero() {
                    self.game.sweep_lines();
                } else if !self.clear_timer.is_armed() {
                    self.clear_timer.arm(now, delay);
                }
                log::debug!("rows {:?} highlighted", rows);
            }
            GameEvent::GameOver { score } => {
                // A pending sweep still runs so the final board is compacted
                self.drop_timer.cancel();
                log::info!("game over with score {}", score);
                self.record_score(score);
            }
            GameEvent::PieceSpawned(_)
            | GameEvent::PieceFrozen { .. }
            | GameEvent::LinesCleared { .. } => {}
        }
    }

    fn record_score(&mut self, score: u32) {
        if score <= self.high_score {
            return;
        }
        self.high_score = score;
        self.new_high_score = true;
        if let Err(e) = self.store.save(score) {
            log::warn!("could not save high score: {}", e);
        }
    }
}
