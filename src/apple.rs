use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use crate::config::Rgb;
use crate::grid::{Cell, GridWorld};

/// Uniform draws attempted before falling back to enumerating free cells.
const MAX_REJECTED_SAMPLES: usize = 64;

/// Result of looking for a free cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Placement {
    Placed(Cell),
    /// Every cell is occupied.
    BoardFull,
}

/// The food currently on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Apple {
    pub position: Cell,
    pub color: Rgb,
}

impl Apple {
    #[must_use]
    pub fn new(position: Cell, color: Rgb) -> Self {
        Self { position, color }
    }

    /// Places a new apple on a cell outside `occupied`, or returns `None`
    /// when the board has no room left.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        grid: GridWorld,
        occupied: &HashSet<Cell>,
        color: Rgb,
    ) -> Option<Self> {
        match free_cell(rng, grid, occupied) {
            Placement::Placed(position) => Some(Self::new(position, color)),
            Placement::BoardFull => None,
        }
    }

    /// Moves the apple to a cell outside `occupied`. The position is left
    /// untouched when the board is full.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid: GridWorld,
        occupied: &HashSet<Cell>,
    ) -> Placement {
        let placement = free_cell(rng, grid, occupied);
        if let Placement::Placed(position) = placement {
            self.position = position;
        }
        placement
    }
}

/// Picks a cell uniformly among those not in `occupied`.
///
/// Candidates are drawn from the whole board and rejected while occupied.
/// Crowded boards switch to choosing directly among the remaining free cells
/// after [`MAX_REJECTED_SAMPLES`] misses, which keeps the distribution uniform.
#[must_use]
pub fn free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridWorld,
    occupied: &HashSet<Cell>,
) -> Placement {
    let taken = occupied.iter().filter(|cell| grid.contains(**cell)).count();
    if taken >= grid.total_cells() {
        return Placement::BoardFull;
    }

    for _ in 0..MAX_REJECTED_SAMPLES {
        let candidate = grid.random_cell(rng);
        if !occupied.contains(&candidate) {
            return Placement::Placed(candidate);
        }
    }

    grid.cells()
        .filter(|cell| !occupied.contains(cell))
        .choose(rng)
        .map_or(Placement::BoardFull, Placement::Placed)
}
