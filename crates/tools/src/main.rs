use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::mapgen::{GeneratedFloor, generate_floor};
use game_core::{Direction, GameConfig, RoomShape, RoomType};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Generates floor layouts and prints them as JSON.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    floor: u8,
    /// Number of consecutive seeds to generate, starting at `--seed`.
    #[arg(short, long, default_value_t = 1)]
    count: u64,
    /// Config file supplying the room target and retry budget.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print one fingerprint per line instead of full layouts.
    #[arg(long)]
    fingerprints_only: bool,
}

#[derive(Serialize)]
struct FloorSummary {
    seed: u64,
    floor: u8,
    fingerprint: String,
    skipped_specials: Vec<RoomType>,
    repairs: usize,
    rooms: Vec<RoomSummary>,
}

#[derive(Serialize)]
struct RoomSummary {
    id: u32,
    x: i32,
    y: i32,
    room_type: RoomType,
    shape: RoomShape,
    doors: Vec<(Direction, u32)>,
}

fn summarize(seed: u64, floor: u8, generated: &GeneratedFloor) -> FloorSummary {
    let rooms = generated
        .graph
        .rooms()
        .iter()
        .map(|room| RoomSummary {
            id: room.id.0,
            x: room.pos.x,
            y: room.pos.y,
            room_type: room.room_type,
            shape: room.shape(),
            doors: room.connections().map(|(direction, target)| (direction, target.0)).collect(),
        })
        .collect();
    FloorSummary {
        seed,
        floor,
        fingerprint: format!("0x{:016x}", generated.graph.fingerprint()),
        skipped_specials: generated.skipped_specials.clone(),
        repairs: generated.repairs.len(),
        rooms,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GameConfig::default(),
    };

    for seed in args.seed..args.seed.saturating_add(args.count) {
        let generated =
            generate_floor(seed, args.floor, config.target_room_count, config.generation_retries)
                .with_context(|| format!("Generation failed for seed {seed}"))?;
        let summary = summarize(seed, args.floor, &generated);
        if args.fingerprints_only {
            println!("{seed} {}", summary.fingerprint);
        } else {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
