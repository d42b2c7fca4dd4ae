//! Key and mouse bindings: normal and vim-style keys, click to place.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Rotate,
    Place,
    Restart,
    Pause,
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows, enter) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Char('r') | KeyCode::Char('u') | KeyCode::Tab => Action::Rotate,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Place,
        KeyCode::Char('R') => Action::Restart,
        _ => Action::None,
    }
}

/// Action from the mouse; the terminal cell is resolved to a board cell by the UI layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    PlaceAt { column: u16, row: u16 },
    Rotate,
    None,
}

pub fn mouse_to_pointer(event: MouseEvent) -> Pointer {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Pointer::PlaceAt {
            column: event.column,
            row: event.row,
        },
        MouseEventKind::Down(MouseButton::Right) => Pointer::Rotate,
        _ => Pointer::None,
    }
}
