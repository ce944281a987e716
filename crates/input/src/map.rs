//! Key mapping from terminal events to engine intents.

use crate::types::{Control, Intent};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Held control bound to a key, if any.
pub fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Control::ShiftLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Control::ShiftRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Control::SoftDrop)
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W')
        | KeyCode::Char('x')
        | KeyCode::Char('X') => Some(Control::RotateRight),
        KeyCode::Char('z')
        | KeyCode::Char('Z')
        | KeyCode::Char('y')
        | KeyCode::Char('Y') => Some(Control::RotateLeft),

        KeyCode::Char(' ') => Some(Control::HardDrop),

        _ => None,
    }
}

/// Map a key event to an intent.
///
/// Held controls produce a press on key-down and a release on key-up. The
/// one-shot keys (hold, pause, restart) fire on key-down only. Terminal
/// auto-repeat is ignored. `start_level` is used by the restart key.
pub fn map_key(key: KeyEvent, start_level: u32) -> Option<Intent> {
    match key.kind {
        KeyEventKind::Press => {
            if let Some(control) = control_for(key.code) {
                return Some(Intent::Press(control));
            }
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Some(Intent::Hold),
                KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Intent::PauseToggle),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Start(start_level)),
                _ => None,
            }
        }
        KeyEventKind::Release => control_for(key.code).map(Intent::Release),
        KeyEventKind::Repeat => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && (matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}
