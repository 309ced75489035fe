use std::fmt;

/// A position on the playing grid. Both axes start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i16,
    pub y: i16,
}

impl Cell {
    pub const fn new(x: i16, y: i16) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, (dx, dy): (i16, i16)) -> Self {
        Cell { x: self.x + dx, y: self.y + dy }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square grid spanning `min..=max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    min: i16,
    max: i16,
}

impl Grid {
    pub fn new(size: i16) -> Self {
        Grid { min: 1, max: size }
    }

    pub fn min(&self) -> i16 {
        self.min
    }

    pub fn size(&self) -> i16 {
        self.max - self.min + 1
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.min..=self.max).contains(&cell.x) && (self.min..=self.max).contains(&cell.y)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (min, max) = (self.min, self.max);
        (min..=max).flat_map(move |y| (min..=max).map(move |x| Cell::new(x, y)))
    }
}
