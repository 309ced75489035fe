mod comments;
mod config;
mod error;
mod food;
mod game;
mod grid;
mod input;
mod snake;
mod term;
mod timer;

use std::{cell::RefCell, io::{self, BufRead}, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::comments::{comments_block, load_comments, validate_unique_ids, Comment};
use crate::config::{GameConfig, DEFAULT_GRID_SIZE, DEFAULT_GROWTH, DEFAULT_SPEED_HZ};
use crate::game::{Control, SnakeGame};
use crate::term::TermManager;

pub type TermInt = u16;
pub type Coords = (u16, u16);

/// Terminal snake, plus the comment section of a story card
#[derive(Parser, Debug)]
#[command(name = "snake", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play snake (the default)
    Play {
        /// Ticks per second
        #[arg(long, default_value_t = DEFAULT_SPEED_HZ)]
        speed: u32,

        /// Side of the square grid
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        grid: i16,

        /// Segments gained per food eaten
        #[arg(long, default_value_t = DEFAULT_GROWTH)]
        growth: usize,
    },
    /// Show the comments of a story and add new ones from stdin
    Comments {
        /// JSON array of {"_id", "creator_name", "content"} records
        file: PathBuf,

        #[arg(long)]
        story_id: String,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();

    match args.command.unwrap_or(Command::Play {
        speed: DEFAULT_SPEED_HZ,
        grid: DEFAULT_GRID_SIZE,
        growth: DEFAULT_GROWTH,
    }) {
        Command::Play { speed, grid, growth } => {
            play(GameConfig { speed_hz: speed, grid_size: grid, growth })
        }
        Command::Comments { file, story_id } => show_comments(&file, &story_id),
    }
}

fn play(config: GameConfig) -> Result<()> {
    config.validate()?;

    let mut term = TermManager::new(config.grid())?;
    term.setup()?;

    let mut game = SnakeGame::new(config, term);
    let result = match game.show_intro() {
        Ok(Control::Quit) => Ok(()),
        Ok(Control::Continue) => game.play(),
        Err(e) => Err(e),
    };

    // Put the terminal back even when the game failed
    let restored = game.into_board().restore();
    result?;
    restored?;
    Ok(())
}

fn show_comments(file: &Path, story_id: &str) -> Result<()> {
    let mut comments = load_comments(file)
        .with_context(|| format!("failed to load comments from {}", file.display()))?;
    validate_unique_ids(&comments)?;
    info!("{} comments on story {}", comments.len(), story_id);

    let pending: RefCell<Vec<Comment>> = RefCell::new(vec![]);
    let add_new_comment = |comment: Comment| pending.borrow_mut().push(comment);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let view = comments_block(&comments, story_id, &add_new_comment);
        for line in view.render_text() {
            println!("{}", line);
        }

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match (line.split_once(':'), view.new_comment()) {
            (Some((name, content)), Some(input)) if !content.trim().is_empty() => {
                input.submit(name.trim(), content.trim())
            }
            _ => warn!("expected `name: text`, got {:?}", line),
        }

        drop(view);
        comments.extend(pending.borrow_mut().drain(..));
        validate_unique_ids(&comments)?;
    }

    Ok(())
}
