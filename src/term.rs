use crate::error::{GameError, Result};
use crate::grid::{Cell, Grid};
use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::{debug, warn};

// Terminal characters are about twice as tall as they are wide
const CELL_WIDTH: TermInt = 2;

const SNAKE_HEAD_CHAR: char = '█';
const SNAKE_BODY_CHAR: char = '▓';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    SnakeHead,
    SnakeBody,
    DeadSnake,
    Food,
}

impl Glyph {
    fn char(self) -> char {
        match self {
            Glyph::SnakeHead => SNAKE_HEAD_CHAR,
            Glyph::SnakeBody => SNAKE_BODY_CHAR,
            Glyph::DeadSnake => DEAD_SNAKE_CHAR,
            Glyph::Food => FOOD_CHAR,
        }
    }
}

/// Surface the game redraws every tick.
pub trait Board {
    /// Blanks every grid cell.
    fn clear(&mut self) -> Result<()>;
    /// Cells outside the grid are not drawn.
    fn draw(&mut self, cell: Cell, glyph: Glyph) -> Result<()>;
    fn show_message(&mut self, lines: &[&str]) -> Result<()>;
    fn hide_message(&mut self) -> Result<()>;
    fn present(&mut self) -> Result<()>;
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    grid: Grid,
    // Top-left corner of the border around the grid
    origin: Coords,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new(grid: Grid) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let side = grid.size() as TermInt;
        let needed = (side * CELL_WIDTH + 2, side + 2);

        if width < needed.0 || height < needed.1 {
            return Err(GameError::TerminalTooSmall { needed, actual: (width, height) });
        }

        let origin = ((width - needed.0) / 2, (height - needed.1) / 2);
        let screen = vec![' '; width as usize * height as usize];
        debug!("terminal {}x{}, board at {:?}", width, height, origin);

        Ok(TermManager { width, height, grid, origin, stdout: stdout(), screen, current_msg: None })
    }

    /// Enters the alternate screen in raw mode. On failure the terminal is
    /// put back before the error is returned.
    pub fn setup(&mut self) -> Result<()> {
        let res = self.enter();
        restore_on_error(res, || self.restore())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Waits up to `timeout` for the first key, then drains whatever else is
    /// already queued.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn enter(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        self.draw_borders()
    }

    fn draw_borders(&mut self) -> Result<()> {
        let side = self.grid.size() as TermInt;
        let (width, height) = (side * CELL_WIDTH + 2, side + 2);
        let (x0, y0) = self.origin;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.present()
    }

    fn to_screen(&self, cell: Cell) -> Option<Coords> {
        if !self.grid.contains(cell) {
            return None;
        }

        let x = self.origin.0 + 1 + (cell.x - self.grid.min()) as TermInt * CELL_WIDTH;
        let y = self.origin.1 + 1 + (cell.y - self.grid.min()) as TermInt;
        Some((x, y))
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // Messages don't touch the screen buffer so hiding them can restore it
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn print_cell(&mut self, cell: Cell, ch: char) -> Result<()> {
        if let Some((x, y)) = self.to_screen(cell) {
            for x_diff in 0..CELL_WIDTH {
                self.print_at((x + x_diff, y), ch)?;
            }
        }
        Ok(())
    }
}

impl Board for TermManager {
    fn clear(&mut self) -> Result<()> {
        let cells: Vec<Cell> = self.grid.cells().collect();
        for cell in cells {
            self.print_cell(cell, ' ')?;
        }
        Ok(())
    }

    fn draw(&mut self, cell: Cell, glyph: Glyph) -> Result<()> {
        self.print_cell(cell, glyph.char())
    }

    fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.present()
    }

    fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                let ch = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch)?;
            }
        }

        self.present()
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }
}

fn restore_on_error(res: Result<()>, restore: impl FnOnce() -> Result<()>) -> Result<()> {
    if let Err(e) = res {
        if let Err(restore_err) = restore() {
            warn!("failed to restore terminal: {}", restore_err);
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as Counter;

    #[test]
    fn failed_setup_restores_the_terminal() {
        let restored = Counter::new(0);
        let res = restore_on_error(Err(GameError::InvalidConfig("boom".into())), || {
            restored.set(restored.get() + 1);
            Ok(())
        });

        assert!(matches!(res, Err(GameError::InvalidConfig(msg)) if msg == "boom"));
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn setup_error_wins_over_restore_error() {
        let res = restore_on_error(Err(GameError::InvalidConfig("setup".into())), || {
            Err(GameError::InvalidConfig("restore".into()))
        });
        assert!(matches!(res, Err(GameError::InvalidConfig(msg)) if msg == "setup"));
    }

    #[test]
    fn successful_setup_leaves_the_terminal_alone() {
        let restored = Counter::new(0);
        let res = restore_on_error(Ok(()), || {
            restored.set(restored.get() + 1);
            Ok(())
        });

        assert!(res.is_ok());
        assert_eq!(restored.get(), 0);
    }
}
