pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
pub const BOARD_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;

// Flat index of a freshly spawned piece's anchor (top row, near center)
pub const SPAWN_ANCHOR: i32 = 4;

pub const POINTS_PER_LINE: u32 = 100;

// Timing defaults (in milliseconds)
pub const DROP_INTERVAL: u64 = 1000;     // Gravity tick at score 0
pub const MIN_DROP_INTERVAL: u64 = 100;  // Floor for score-scaled gravity
pub const SPEEDUP_SCORE_STEP: u32 = 500; // Points needed for each speed step
pub const SPEEDUP_AMOUNT: u64 = 100;     // Interval reduction per speed step
pub const LINE_CLEAR_DELAY: u64 = 1000;  // Highlight time before a full row is swept

pub const DEFAULT_CONFIG_PATH: &str = "blockfall.toml";
pub const DEFAULT_HIGH_SCORE_PATH: &str = "blockfall_highscore.json";
