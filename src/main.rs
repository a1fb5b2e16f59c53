use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    fs::File,
    io::{self, stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use blockfall::config::AppConfig;
use blockfall::constants::DEFAULT_CONFIG_PATH;
use blockfall::game::{Game, Session};
use blockfall::input::handle_input;
use blockfall::storage::{HighScoreStore, JsonFileStore, MemoryStore};
use blockfall::ui::ui;

/// Falling-block puzzle in the terminal.
#[derive(Parser)]
#[command(name = "blockfall", version, about)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed the piece generator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Override where the high score is stored
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    // The terminal UI owns stdout/stderr, so logs only go to a file
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    init_logging(cli.log_file.as_deref())?;

    let config = AppConfig::load_or_default(&cli.config)?;
    let store: Box<dyn HighScoreStore> = match cli.high_score_file.or(config.storage.high_score_path) {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };
    let game = match cli.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };
    let mut session = Session::new(game, config.timing, store);

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut session);

    // Cleanup, even when the loop failed
    restore_terminal();
    let _ = terminal.show_cursor();

    log::info!("exiting with score {}", session.game.score);
    result
}

/// Enters raw mode and the alternate screen. Any partial setup is undone
/// before an error is returned.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    let terminal = execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
    if terminal.is_err() {
        restore_terminal();
    }
    terminal
}

fn restore_terminal() {
    let mut stdout = stdout();
    let _ = execute!(stdout, DisableMouseCapture);
    let _ = terminal::disable_raw_mode();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|f| ui(f, session))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event::read()? {
                if !handle_input(session, code, kind, modifiers, Instant::now()) {
                    return Ok(());
                }
            }
        }

        session.update(Instant::now());
    }
}
