use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod engine;
mod error;
mod tui;
mod tui128;

use engine::game::Game;
use engine::store::{load_or_seed, FileStorage, MemoryStorage, Storage};
use tui::crossterm::{Crossterm, CrosstermEvents};
use tui128::Tui128;

/// Slide and merge tiles on a 4x4 board until one of them reaches 128.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Where the game is saved after every change and restored from on startup.
    #[arg(long, default_value = "tui128.json")]
    state_file: PathBuf,

    /// Keep the game in memory only.
    #[arg(long)]
    no_save: bool,

    #[arg(long, default_value = "tui128.log")]
    log_file: PathBuf,

    /// Seed for tile placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of undo steps to keep.
    #[arg(long)]
    history_limit: Option<usize>,

    #[command(flatten)]
    verbose: Verbosity,
}

fn setup_logging(args: &Args) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(args.verbose.log_level_filter())
        .chain(
            fern::log_file(&args.log_file)
                .with_context(|| format!("opening log file {}", args.log_file.display()))?,
        )
        .apply()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let storage: Box<dyn Storage> = if args.no_save {
        Box::<MemoryStorage>::default()
    } else {
        Box::new(FileStorage::new(&args.state_file))
    };
    let state = load_or_seed(storage.as_ref(), &mut rng);
    let game = Game::with_state(rng, state).history_limit(args.history_limit);

    let renderer = Crossterm::new(Box::new(stdout().lock()))?;
    let event_source = CrosstermEvents::default();
    let tui128 = Tui128::new(game, storage, renderer, event_source);

    let state = tui128.run().context("running game")?;
    log::info!(
        "exiting with score {} and highest tile {}",
        state.score,
        state.board.max_tile()
    );

    Ok(())
}
