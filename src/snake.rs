use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::grid::{Cell, GridWorld};
use crate::input::Direction;

/// Mutable snake state: body, applied and queued direction, pending growth.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    pending_direction: Option<Direction>,
    grow: bool,
}

impl Snake {
    /// Creates a one-cell snake at `start` heading in `direction`.
    #[must_use]
    pub fn new(start: Cell, direction: Direction) -> Self {
        Self::from_segments(vec![start], direction)
    }

    /// Creates the initial snake: one cell on the board center, random heading.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(grid: GridWorld, rng: &mut R) -> Self {
        Self::new(grid.center(), Direction::random(rng))
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: None,
            grow: false,
        }
    }

    /// Queues `intent` for the next move unless it would reverse a snake
    /// longer than one cell. A later accepted intent replaces an earlier one.
    pub fn update_direction(&mut self, intent: Direction) {
        if self.body.len() > 1 && intent == self.direction.opposite() {
            return;
        }
        self.pending_direction = Some(intent);
    }

    /// Returns the head position the next move will produce.
    #[must_use]
    pub fn next_head(&self, grid: GridWorld) -> Cell {
        let head = self.head();
        let (dx, dy) = self.pending_direction.unwrap_or(self.direction).delta();
        grid.wrap(head.x + dx, head.y + dy)
    }

    /// Applies one movement step, committing any queued direction first.
    pub fn move_forward(&mut self, grid: GridWorld) {
        let next_head = self.next_head(grid);
        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        self.body.push_front(next_head);
        if !self.grow {
            let _ = self.body.pop_back();
        }
        self.grow = false;
    }

    /// Makes the next move keep its tail.
    pub fn grow(&mut self) {
        self.grow = true;
    }

    /// Returns true when the next move will keep its tail.
    #[must_use]
    pub fn is_growing(&self) -> bool {
        self.grow
    }

    /// Back to a single cell on the board center with a fresh heading.
    pub fn reset<R: Rng + ?Sized>(&mut self, grid: GridWorld, rng: &mut R) {
        *self = Self::spawn(grid, rng);
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns the set of cells covered by the body.
    #[must_use]
    pub fn occupied(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake has at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the applied movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction queued for the next move, if any.
    #[must_use]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Cell> {
        self.body.iter()
    }
}
