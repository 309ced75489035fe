use log::debug;

use crate::snake::Direction;

pub const DEFAULT_DIRECTION: Direction = Direction::Down;

/// Heading requested by the player. A turn straight back onto the neck is
/// ignored, judged against the heading the snake last moved with.
#[derive(Debug, Clone, Copy)]
pub struct InputDirection {
    requested: Direction,
    last_applied: Direction,
}

impl InputDirection {
    pub fn new() -> Self {
        InputDirection { requested: DEFAULT_DIRECTION, last_applied: DEFAULT_DIRECTION }
    }

    pub fn request(&mut self, direction: Direction) {
        if direction == self.last_applied.opposite() {
            debug!("ignoring reversal to {:?}", direction);
            return;
        }
        self.requested = direction;
    }

    /// Direction for the next move; it becomes the reference for reversals.
    pub fn take(&mut self) -> Direction {
        self.last_applied = self.requested;
        self.requested
    }

    pub fn reset(&mut self) {
        *self = InputDirection::new();
    }
}

impl Default for InputDirection {
    fn default() -> Self {
        InputDirection::new()
    }
}
