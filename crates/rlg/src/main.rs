//! rlg: generate, save, load and play a dungeon level
//!
//! Main entry point.

mod input;

use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::info;
use strum::IntoEnumIterator;

use rlg_core::action::IdleInput;
use rlg_core::dungeon::generate_level;
use rlg_core::world::{GenerationConfig, RoomStrategy};
use rlg_core::{GameLoop, GameOutcome, GameRng};
use rlg_save::{default_save_path, load_dungeon_sized, save_dungeon};

use crate::input::LineInput;

/// Dungeon generator and turn simulator
#[derive(Parser, Debug)]
#[command(name = "rlg")]
#[command(author, version, about = "Generate a dungeon and watch its monsters hunt you", long_about = None)]
struct Args {
    /// Seed for the random number generator
    #[arg(short = 'r', long = "seed")]
    seed: Option<u64>,

    /// Load the level from FILE instead of generating one (default: ~/.rlg327/dungeon)
    #[arg(long = "load", value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    load: Option<String>,

    /// Save the level to FILE (default: ~/.rlg327/dungeon)
    #[arg(long = "save", value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
    save: Option<String>,

    /// Number of monsters
    #[arg(short = 'n', long = "nummon")]
    nummon: Option<usize>,

    /// Room placement strategy (retry or bisection)
    #[arg(long = "strategy", value_parser = parse_strategy)]
    strategy: Option<RoomStrategy>,

    /// JSON file with generation parameters
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run this many turns with a player that never moves
    #[arg(long = "turns")]
    turns: Option<u64>,

    /// Read moves from stdin (y k u h l b j n, '.' stay, 'm' monsters, 'q' quit)
    #[arg(long = "play")]
    play: bool,
}

fn parse_strategy(value: &str) -> Result<RoomStrategy, String> {
    RoomStrategy::from_str(value).map_err(|_| {
        let known: Vec<String> = RoomStrategy::iter().map(|s| s.to_string()).collect();
        format!("unknown strategy {value:?}, expected one of {}", known.join(", "))
    })
}

/// A bare `--load`/`--save` means the default save file
fn resolve(path: String) -> PathBuf {
    if path.is_empty() {
        default_save_path()
    } else {
        PathBuf::from(path)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load_from_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(nummon) = args.nummon {
        config.monster_count = nummon;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    config.validate()?;

    let mut rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    println!("Using seed: {}", rng.seed());

    let mut game = match args.load.map(resolve) {
        Some(path) => {
            let saved = load_dungeon_sized(&path, config.width, config.height)?;
            info!("loaded {}", path.display());
            GameLoop::populate_at(saved.level, saved.player, &config, rng)?
        }
        None => {
            let level = generate_level(&config, &mut rng)?;
            GameLoop::populate(level, &config, rng)?
        }
    };

    if let Some(path) = args.save.map(resolve) {
        let player = game.player().map(|p| p.position).unwrap_or_default();
        save_dungeon(&path, game.level(), player)?;
        println!("Saved to {}", path.display());
    }

    let outcome = if args.play {
        Some(game.run(&mut LineInput::stdin(), None))
    } else {
        args.turns.map(|turns| game.run(&mut IdleInput, Some(turns)))
    };

    print!("{}", game.render());
    match outcome {
        Some(GameOutcome::PlayerDied) => println!("You were killed after {} turns.", game.turns()),
        Some(GameOutcome::PlayerQuit) => println!("You quit."),
        Some(GameOutcome::Victory) => println!("Every monster is dead. You win!"),
        Some(GameOutcome::TurnLimit) => println!(
            "Still alive after {} turns, {} monsters remain.",
            game.turns(),
            game.monsters_alive()
        ),
        None => {}
    }
    Ok(())
}
