use std::time::Duration;

use crate::error::{GameError, Result};
use crate::grid::Grid;
use crate::input::DEFAULT_DIRECTION;
use crate::snake::ORIGIN_BODY;

pub const DEFAULT_SPEED_HZ: u32 = 5;
pub const DEFAULT_GRID_SIZE: i16 = 21;
pub const DEFAULT_GROWTH: usize = 1;

const MAX_SPEED_HZ: u32 = 60;
const MAX_GRID_SIZE: i16 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Ticks per second
    pub speed_hz: u32,
    /// Side of the square grid; bounds are `1..=grid_size`
    pub grid_size: i16,
    /// Segments added per food eaten
    pub growth: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            speed_hz: DEFAULT_SPEED_HZ,
            grid_size: DEFAULT_GRID_SIZE,
            growth: DEFAULT_GROWTH,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.speed_hz == 0 || self.speed_hz > MAX_SPEED_HZ {
            return Err(GameError::InvalidConfig(format!(
                "speed must be between 1 and {} ticks per second, got {}",
                MAX_SPEED_HZ, self.speed_hz
            )));
        }

        // The starting snake and its first move have to fit inside the grid
        let first_head = ORIGIN_BODY[0].offset(DEFAULT_DIRECTION.vector());
        let min_grid = ORIGIN_BODY
            .iter()
            .chain(std::iter::once(&first_head))
            .map(|c| c.x.max(c.y))
            .max()
            .unwrap_or(1);
        if self.grid_size < min_grid || self.grid_size > MAX_GRID_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "grid size must be between {} and {}, got {}",
                min_grid, MAX_GRID_SIZE, self.grid_size
            )));
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_size)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.speed_hz.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_tick_five_times_a_second_on_a_21_grid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
        assert_eq!(config.grid(), Grid::new(21));
    }

    #[test]
    fn rejects_zero_speed() {
        let config = GameConfig { speed_hz: 0, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_grid_that_cannot_hold_the_starting_snake() {
        let config = GameConfig { grid_size: 10, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        // The body fits in 11, but the first move would already leave the grid
        let config = GameConfig { grid_size: 11, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = GameConfig { grid_size: 12, ..GameConfig::default() };
        assert!(config.validate().is_ok());
    }
}
