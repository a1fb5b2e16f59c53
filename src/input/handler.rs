use std::time::Instant;

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

use crate::game::{Command, Session};

pub fn map_key(key_code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers) -> Option<Command> {
    // Only presses and auto-repeat count; releases carry no action
    if kind == KeyEventKind::Release {
        return None;
    }
    if modifiers.contains(KeyModifiers::CONTROL) && key_code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match key_code {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Up => Some(Command::Rotate),
        KeyCode::Down => Some(Command::HardDrop),
        KeyCode::Char(' ') => Some(Command::SoftDrop),
        KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Start),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

/// Routes a key event into the session. Returns false when the player quit.
pub fn handle_input(
    session: &mut Session,
    key_code: KeyCode,
    kind: KeyEventKind,
    modifiers: KeyModifiers,
    now: Instant,
) -> bool {
    match map_key(key_code, kind, modifiers) {
        Some(command) => session.handle(command, now),
        None => true,
    }
}
