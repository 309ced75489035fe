use rand::{seq::SliceRandom, Rng};

use crate::grid::{Cell, Grid};
use crate::snake::Snake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    cell: Cell,
}

impl Food {
    pub fn at(cell: Cell) -> Self {
        Food { cell }
    }

    /// Picks a random grid cell not covered by the snake, or `None` when the
    /// snake fills the whole grid.
    pub fn spawn<R: Rng + ?Sized>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Food> {
        let choices: Vec<Cell> = grid.cells().filter(|cell| !snake.occupies(*cell)).collect();
        choices.choose(rng).copied().map(Food::at)
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn is_eaten_by(&self, snake: &Snake) -> bool {
        snake.head() == self.cell
    }
}
