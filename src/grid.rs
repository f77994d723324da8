use rand::Rng;

use crate::config::ConfigError;

/// Board position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Immutable board geometry. Every coordinate the simulation stores has been
/// passed through [`GridWorld::wrap`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridWorld {
    width: u16,
    height: u16,
    cell_size: u16,
}

impl GridWorld {
    /// Creates a board of `width` x `height` cells.
    ///
    /// `cell_size` only matters to renderers.
    pub fn new(width: u16, height: u16, cell_size: u16) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        Ok(Self {
            width,
            height,
            cell_size,
        })
    }

    #[must_use]
    pub fn width(self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn cell_size(self) -> u16 {
        self.cell_size
    }

    /// Returns the total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Maps an arbitrary coordinate pair onto the torus.
    #[must_use]
    pub fn wrap(self, x: i32, y: i32) -> Cell {
        Cell {
            x: wrap_axis(x, i32::from(self.width)),
            y: wrap_axis(y, i32::from(self.height)),
        }
    }

    /// Returns the cell a fresh snake starts on.
    #[must_use]
    pub fn center(self) -> Cell {
        Cell {
            x: i32::from(self.width / 2),
            y: i32::from(self.height / 2),
        }
    }

    /// Returns true when `cell` lies on the board.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Cell { x, y }))
    }

    /// Draws a cell uniformly from the whole board.
    #[must_use]
    pub fn random_cell<R: Rng + ?Sized>(self, rng: &mut R) -> Cell {
        Cell {
            x: rng.gen_range(0..i32::from(self.width)),
            y: rng.gen_range(0..i32::from(self.height)),
        }
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    ((value % upper_bound) + upper_bound) % upper_bound
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    use super::{Cell, GridWorld};
    use crate::config::ConfigError;

    fn grid(width: u16, height: u16) -> GridWorld {
        GridWorld::new(width, height, 1).expect("test grid should be valid")
    }

    #[rstest]
    #[case(Cell::new(3, 4), Cell::new(3, 4))]
    #[case(Cell::new(-1, 3), Cell::new(9, 3))]
    #[case(Cell::new(10, 3), Cell::new(0, 3))]
    #[case(Cell::new(4, 8), Cell::new(4, 0))]
    #[case(Cell::new(4, -1), Cell::new(4, 7))]
    #[case(Cell::new(-21, 17), Cell::new(9, 1))]
    fn wrap_lands_inside_the_board(#[case] input: Cell, #[case] expected: Cell) {
        assert_eq!(grid(10, 8).wrap(input.x, input.y), expected);
    }

    #[test]
    fn wrap_is_always_in_range() {
        let grid = grid(7, 3);
        for x in -30..30 {
            for y in -30..30 {
                assert!(grid.contains(grid.wrap(x, y)), "({x}, {y}) escaped the board");
            }
        }
    }

    #[test]
    fn center_uses_integer_halves() {
        assert_eq!(grid(8, 8).center(), Cell::new(4, 4));
        assert_eq!(grid(32, 24).center(), Cell::new(16, 12));
        assert_eq!(grid(1, 1).center(), Cell::new(0, 0));
    }

    #[test]
    fn cells_cover_the_board_once() {
        let grid = grid(4, 3);
        let cells: Vec<Cell> = grid.cells().collect();

        assert_eq!(cells.len(), grid.total_cells());
        assert_eq!(cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(cells.last(), Some(&Cell::new(3, 2)));
        assert!(cells.iter().all(|cell| grid.contains(*cell)));
    }

    #[test]
    fn random_cells_stay_on_the_board() {
        let grid = grid(5, 2);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            assert!(grid.contains(grid.random_cell(&mut rng)));
        }
    }

    #[test]
    fn degenerate_boards_are_rejected() {
        assert!(matches!(
            GridWorld::new(0, 5, 1),
            Err(ConfigError::EmptyGrid { width: 0, height: 5 })
        ));
        assert!(matches!(
            GridWorld::new(5, 5, 0),
            Err(ConfigError::ZeroCellSize)
        ));
    }
}
