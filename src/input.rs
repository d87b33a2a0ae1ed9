use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

/// Movement heading of the snake head.
///
/// `None` is the idle state before the first move of a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Heading {
    /// Returns the unit `(dx, dy)` step; `(0, 0)` for `None`.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }

    /// Returns the opposite heading. `None` is its own opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    #[must_use]
    pub fn is_moving(self) -> bool {
        self != Self::None
    }

    /// Returns whether `next` may replace this heading (no immediate 180° turns).
    ///
    /// Any real heading is accepted while idle; `None` is never accepted as a request.
    #[must_use]
    pub fn accepts(self, next: Heading) -> bool {
        next.is_moving() && (!self.is_moving() || next != self.opposite())
    }
}

/// High-level input events produced by the terminal front-end.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Turn(Heading),
    Confirm,
    Quit,
}

/// Maps a terminal event to a game input, ignoring key releases and repeats.
#[must_use]
pub fn map_event(event: &Event) -> Option<GameInput> {
    let Event::Key(key) = event else {
        return None;
    };
    map_key(*key)
}

fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Turn(Heading::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Turn(Heading::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Turn(Heading::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => GameInput::Turn(Heading::Right),
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => GameInput::Quit,
        _ => return None,
    };
    Some(input)
}
