use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::Rng;
use rand::seq::SliceRandom;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step `(dx, dy)`; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Picks one of the four directions uniformly.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::Right)
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Quit,
}

/// Source of input events, polled once at the start of every tick.
///
/// Implementations must not block: they return whatever arrived since the
/// previous poll, in arrival order, possibly nothing.
pub trait InputAdapter {
    fn poll(&mut self) -> io::Result<Vec<GameInput>>;
}

/// Keyboard input read from the terminal through crossterm.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl InputAdapter for KeyboardInput {
    fn poll(&mut self) -> io::Result<Vec<GameInput>> {
        let mut inputs = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                inputs.extend(map_key(key));
            }
        }
        Ok(inputs)
    }
}

/// Translates one key event into a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(GameInput::Quit),
        (_, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('q')) => Some(GameInput::Quit),
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('w' | 'k')) => {
            Some(GameInput::Direction(Direction::Up))
        }
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('s' | 'j')) => {
            Some(GameInput::Direction(Direction::Down))
        }
        (_, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('a' | 'h')) => {
            Some(GameInput::Direction(Direction::Left))
        }
        (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('d' | 'l')) => {
            Some(GameInput::Direction(Direction::Right))
        }
        _ => None,
    }
}

/// Replays prepared batches, one per poll, then asks the loop to quit.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    batches: VecDeque<Vec<GameInput>>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<GameInput>>,
    {
        Self {
            batches: batches.into_iter().collect(),
        }
    }
}

impl InputAdapter for ScriptedInput {
    fn poll(&mut self) -> io::Result<Vec<GameInput>> {
        Ok(self
            .batches
            .pop_front()
            .unwrap_or_else(|| vec![GameInput::Quit]))
    }
}
