//! Key mapping from terminal events to game actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameAction;

/// Map keyboard input to game actions.
///
/// The mapping is mode-blind: Escape always yields [`GameAction::Pause`]
/// and Enter always yields [`GameAction::Confirm`]; whether that pauses,
/// aborts, starts or resumes is decided by the engine. Callers should test
/// [`should_quit`] first, since Ctrl+C would otherwise read as a hold.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    match key.code {
        // Movement
        KeyCode::Left => Some(GameAction::MoveLeft),
        KeyCode::Right => Some(GameAction::MoveRight),
        KeyCode::Down => Some(GameAction::SoftDrop),

        // Rotation
        KeyCode::Up => Some(GameAction::RotateCw),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(GameAction::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(GameAction::Hold),

        // Mode control
        KeyCode::Esc => Some(GameAction::Pause),
        KeyCode::Enter => Some(GameAction::Confirm),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(GameAction::LevelUp),

        _ => None,
    }
}

/// Check if a key should quit the program outright.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
