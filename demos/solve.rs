//! Command-line solver for hexgate boards.
//!
//! Run: cargo run --bin hexgate-solve -- --strategy bfs --origin 3

use std::path::PathBuf;

use clap::Parser;
use hexgate_core::HexGrid;
use hexgate_demos::{random_level, render, sample_level};
use hexgate_paths::{PathFinder, SearchConfig, Strategy, verify_path};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::EnvFilter;

/// Largest side accepted for random boards.
const MAX_SIDE: i64 = 1024;

/// Find a path through a board whose gates open and close with the turns.
#[derive(Parser)]
#[command(name = "hexgate-solve", version, long_about = None)]
struct Cli {
    /// best-first, breadth-first or fallback
    #[arg(short, long, default_value = "fallback")]
    strategy: Strategy,

    /// Game turn at which the walk begins
    #[arg(short, long, default_value_t = 0)]
    origin: u32,

    /// Read the board from a text layout file
    #[arg(long, conflicts_with = "seed")]
    layout: Option<PathBuf>,

    /// Generate a random board from this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Random board width
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(i32).range(1..=MAX_SIDE))]
    width: i32,

    /// Random board height
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i32).range(1..=MAX_SIDE))]
    height: i32,

    /// Percentage of random cells that become walls
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(0..=100))]
    walls: u32,

    /// Search limits as JSON; missing fields keep their defaults
    #[arg(long)]
    limits: Option<PathBuf>,

    /// Print the full report as JSON instead of a drawing
    #[arg(long)]
    json: bool,
}

fn load_board(cli: &Cli) -> Result<HexGrid, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.layout {
        let text = std::fs::read_to_string(path)?;
        return Ok(HexGrid::from_layout(&text)?);
    }
    if let Some(seed) = cli.seed {
        let mut rng = SmallRng::seed_from_u64(seed);
        return Ok(random_level(cli.width, cli.height, cli.walls, &mut rng)?);
    }
    Ok(sample_level()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let grid = load_board(&cli)?;
    let config: SearchConfig = match &cli.limits {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };

    let finder = PathFinder::with_config(&grid, config);
    let report = finder.find(cli.strategy, grid.start(), grid.goal(), cli.origin);
    if report.is_found() {
        verify_path(&grid, &report.path, grid.start(), grid.goal(), cli.origin)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&grid, &report.path));
        println!("{}", report.reason());
    }

    match report.failure {
        None => Ok(()),
        Some(failure) => Err(failure.into()),
    }
}
