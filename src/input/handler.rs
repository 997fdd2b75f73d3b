use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Action;

/// What a key press asks the interactive driver to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Action),
    Restart,
    Quit,
    None,
}

/// Maps terminal key events onto grid moves and driver commands
///
/// Arrow keys and WASD both work. Up/W moves towards row 0.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Move(Action::Up),
            KeyCode::Down => KeyAction::Move(Action::Down),
            KeyCode::Left => KeyAction::Move(Action::Left),
            KeyCode::Right => KeyAction::Move(Action::Right),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => KeyAction::Move(Action::Up),
                's' => KeyAction::Move(Action::Down),
                'a' => KeyAction::Move(Action::Left),
                'd' => KeyAction::Move(Action::Right),
                'r' => KeyAction::Restart,
                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },

            KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
