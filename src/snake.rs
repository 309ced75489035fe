use std::collections::VecDeque;

use crate::grid::{Cell, Grid};
use Direction::*;

/// Starting body, head first. The snake points down, away from its tail.
pub const ORIGIN_BODY: [Cell; 3] = [Cell::new(11, 11), Cell::new(11, 10), Cell::new(11, 9)];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn vector(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Body cells, head first. Never empty.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new() -> Self {
        Snake { body: ORIGIN_BODY.iter().copied().collect() }
    }

    #[cfg(test)]
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Snake { body: cells.into_iter().collect() }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Moves one cell along `direction`: the tail is dropped and a new head is
    /// pushed in front. Bounds and collisions are left to the caller.
    pub fn update(&mut self, direction: Direction) {
        let new_head = self.head().offset(direction.vector());
        self.body.pop_back();
        self.body.push_front(new_head);
    }

    pub fn reset(&mut self) {
        self.body.clear();
        self.body.extend(ORIGIN_BODY.iter().copied());
    }

    /// Appends `segments` copies of the tail; they unfold over the next moves.
    pub fn grow(&mut self, segments: usize) {
        if let Some(&tail) = self.body.back() {
            self.body.extend(std::iter::repeat(tail).take(segments));
        }
    }

    pub fn out_of_bounds(&self, grid: &Grid) -> bool {
        !grid.contains(self.head())
    }

    pub fn intersects_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }
}

impl Default for Snake {
    fn default() -> Self {
        Snake::new()
    }
}
