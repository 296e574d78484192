use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    R,
    Q,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        if (ev.modifiers, ev.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
            return Some(Command::Quit);
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if !normal_modifiers.contains(ev.modifiers) {
            return None;
        }
        match ev.code {
            KeyCode::Char('w' | 'W') | KeyCode::Up => Some(Command::Up),
            KeyCode::Char('s' | 'S') | KeyCode::Down => Some(Command::Down),
            KeyCode::Char('a' | 'A') | KeyCode::Left => Some(Command::Left),
            KeyCode::Char('d' | 'D') | KeyCode::Right => Some(Command::Right),
            KeyCode::Char('r' | 'R') => Some(Command::R),
            KeyCode::Char('q' | 'Q') => Some(Command::Q),
            _ => None,
        }
    }
}
