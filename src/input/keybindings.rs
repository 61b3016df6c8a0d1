//! Default key bindings
//!
//! Resolves terminal key events into navigator commands. Shift is ignored
//! for character keys since the terminal already reports `C` rather than `c`.

use crate::view::file_tree::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Navigate(Command),
    Quit,
}

/// Map a key event to an action, `None` for unbound keys and releases
pub fn resolve(event: &KeyEvent) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let modifiers = event.modifiers.difference(KeyModifiers::SHIFT);
    if modifiers == KeyModifiers::CONTROL {
        return match event.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    if !modifiers.is_empty() {
        return None;
    }

    let command = match event.code {
        KeyCode::Up | KeyCode::Char('k') => Command::Up,
        KeyCode::Down | KeyCode::Char('j') => Command::Down,
        KeyCode::PageUp => Command::PageUp,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Command::First,
        KeyCode::End | KeyCode::Char('G') => Command::Last,
        KeyCode::Enter | KeyCode::Char(' ') => Command::Select,
        KeyCode::Char('o') => Command::Open,
        KeyCode::Left | KeyCode::Char('h') => Command::DrillOut,
        KeyCode::Right | KeyCode::Char('l') => Command::DrillIn,
        KeyCode::Char('c') => Command::ZoomIn,
        KeyCode::Char('C') => Command::ZoomOut,
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Navigate(command))
}
