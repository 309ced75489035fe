use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::error::Result;
use crate::food::Food;
use crate::grid::Grid;
use crate::input::InputDirection;
use crate::snake::{Direction, Snake, ORIGIN_BODY};
use crate::term::{Board, Glyph, TermManager};
use crate::timer::TickTimer;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

// How long to wait for keys while no tick is scheduled
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub fn check_game_over(snake: &Snake, grid: &Grid) -> bool {
    snake.out_of_bounds(grid) || snake.intersects_self()
}

pub struct SnakeGame<B: Board> {
    config: GameConfig,
    grid: Grid,
    board: B,
    snake: Snake,
    input: InputDirection,
    food: Option<Food>,
    state: GameState,
    won: bool,
    timer: TickTimer,
    rng: StdRng,
}

impl<B: Board> SnakeGame<B> {
    pub fn new(config: GameConfig, board: B) -> Self {
        Self::with_rng(config, board, StdRng::from_entropy())
    }

    pub fn with_rng(config: GameConfig, board: B, mut rng: StdRng) -> Self {
        let grid = config.grid();
        let snake = Snake::new();
        let food = Food::spawn(&grid, &snake, &mut rng);

        SnakeGame {
            config,
            grid,
            board,
            snake,
            input: InputDirection::new(),
            food,
            state: GameState::Running,
            won: false,
            timer: TickTimer::new(config.tick_interval()),
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn score(&self) -> usize {
        self.snake.len().saturating_sub(ORIGIN_BODY.len())
    }

    pub fn into_board(self) -> B {
        self.board
    }

    /// Draws the first frame and schedules the tick.
    pub fn start(&mut self) -> Result<()> {
        info!("starting at {} ticks per second", self.config.speed_hz);
        self.draw()?;
        self.timer.start(Instant::now());
        Ok(())
    }

    /// One update-then-draw cycle. Does nothing unless running.
    pub fn tick(&mut self) -> Result<()> {
        if self.state != GameState::Running {
            return Ok(());
        }

        self.update();
        self.draw()?;

        if self.is_game_over() {
            self.timer.cancel();
            info!("game over with score {}", self.score());

            let title = if self.won {"You won!"} else {"Game Over"};
            let score = format!("Score: {}", self.score());
            self.board.show_message(&[title, score.as_str(), "", "Press R to restart"])?;
        }

        Ok(())
    }

    /// Cancels the current tick, puts everything back to its starting point and
    /// schedules a fresh tick at the same rate.
    pub fn restart(&mut self) -> Result<()> {
        if self.timer.is_active() {
            debug!("cancelling the running tick");
            self.timer.cancel();
        }
        info!("restarting");

        self.state = GameState::Running;
        self.won = false;
        self.snake.reset();
        self.input.reset();
        self.food = Food::spawn(&self.grid, &self.snake, &mut self.rng);

        self.board.hide_message()?;
        self.draw()?;
        self.timer.start(Instant::now());
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<()> {
        match self.state {
            GameState::Running => {
                self.timer.cancel();
                self.state = GameState::Paused;
                self.board.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])
            }
            GameState::Paused => {
                self.state = GameState::Running;
                self.board.hide_message()?;
                self.timer.start(Instant::now());
                Ok(())
            }
            GameState::GameOver => Ok(()),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<Control> {
        if is_ctrl_c(key) {
            return Ok(Control::Quit);
        }

        match key.code {
            KeyCode::Char('w') | KeyCode::Up => self.input.request(Direction::Up),
            KeyCode::Char('a') | KeyCode::Left => self.input.request(Direction::Left),
            KeyCode::Char('s') | KeyCode::Down => self.input.request(Direction::Down),
            KeyCode::Char('d') | KeyCode::Right => self.input.request(Direction::Right),
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart()?,
            KeyCode::Esc => self.toggle_pause()?,
            _ => {}
        }

        Ok(Control::Continue)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn update(&mut self) {
        let direction = self.input.take();
        self.snake.update(direction);
        self.update_food();

        if self.won || check_game_over(&self.snake, &self.grid) {
            self.state = GameState::GameOver;
        }
    }

    fn update_food(&mut self) {
        let eaten = matches!(&self.food, Some(food) if food.is_eaten_by(&self.snake));
        if !eaten {
            return;
        }

        self.snake.grow(self.config.growth);
        self.food = Food::spawn(&self.grid, &self.snake, &mut self.rng);
        debug!("food eaten at {}, length {}", self.snake.head(), self.snake.len());

        if self.food.is_none() {
            self.won = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        self.board.clear()?;

        let dead = self.is_game_over() && !self.won;
        for (i, segment) in self.snake.body().iter().enumerate() {
            let glyph = match (dead, i) {
                (true, _) => Glyph::DeadSnake,
                (false, 0) => Glyph::SnakeHead,
                (false, _) => Glyph::SnakeBody,
            };
            self.board.draw(*segment, glyph)?;
        }

        if let Some(food) = &self.food {
            self.board.draw(food.cell(), Glyph::Food)?;
        }

        self.board.present()
    }
}

impl SnakeGame<TermManager> {
    pub fn show_intro(&mut self) -> Result<Control> {
        self.board.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause, R to restart",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.board.read_key_blocking()?;
        self.board.hide_message()?;

        Ok(if is_ctrl_c(&key) {Control::Quit} else {Control::Continue})
    }

    /// Runs until the player quits. Keys are read only until the next tick is
    /// due, so each tick runs to completion before the next one.
    pub fn play(&mut self) -> Result<()> {
        self.start()?;

        loop {
            let now = Instant::now();
            let timeout = self.timer.time_until_due(now).unwrap_or(IDLE_POLL);

            for key_ev in self.board.read_key_events(timeout)? {
                if self.handle_key(&key_ev)? == Control::Quit {
                    info!("quitting while {:?} with score {}", self.state(), self.score());
                    return Ok(());
                }
            }

            let now = Instant::now();
            if self.timer.is_due(now) {
                self.timer.advance(now);
                self.tick()?;
            }
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
