use std::io;

use anyhow::{Result, bail, ensure};
use clap::Parser;
use game_core::player::PLAYER_MAX_HP;
use game_core::{Game, GameConfig, GameEvent, PlayerHandle, PlayerInput, Point, RoomType};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing_subscriber::EnvFilter;

/// Drives a run with random inputs and checks invariants after every tick.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 10_000)]
    ticks: u32,
    /// Keep the player alive so the run explores further.
    #[arg(long)]
    unkillable: bool,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn random_input(rng: &mut ChaCha8Rng, held: &mut PlayerInput) -> PlayerInput {
    // Hold a direction for a while so the player actually reaches doors.
    if rng.next_u64() % 30 == 0 {
        held.move_x = choose(rng, &[-1.0, 0.0, 1.0]);
        held.move_y = choose(rng, &[-1.0, 0.0, 1.0]);
    }
    let aim_x = (rng.next_u64() % 750) as f32;
    let aim_y = (rng.next_u64() % 750) as f32;
    PlayerInput {
        move_x: held.move_x,
        move_y: held.move_y,
        aim: Point::new(aim_x, aim_y),
        shoot: rng.next_u64() % 4 == 0,
        reload: rng.next_u64() % 50 == 0,
        dodge: rng.next_u64() % 80 == 0,
    }
}

fn check_invariants(game: &Game) -> Result<()> {
    let rooms = game.rooms();
    let graph = rooms.graph();
    ensure!(graph.is_symmetric(), "room graph lost connection symmetry");
    for room_type in RoomType::SPECIAL {
        ensure!(graph.count_of_type(room_type) <= 1, "more than one {room_type} room");
    }

    let player = game.player();
    ensure!(player.hp() <= PLAYER_MAX_HP, "player hp above maximum");
    ensure!(
        game.config().room_bounds().contains(player.position()),
        "player left the room at {:?}",
        player.position()
    );

    let Some(current) = rooms.current_room() else {
        bail!("no current room after a tick");
    };
    ensure!(
        game.enemies().enemies().all(|enemy| enemy.room == current),
        "enemy outside the current room"
    );
    let living = game.enemies().living_in(current);
    ensure!(
        rooms.cooldown().enemy_lock == (living > 0),
        "door lock out of sync with {living} living enemies"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} ticks...", args.seed, args.ticks);
    let mut game = Game::new(args.seed, GameConfig::default())?;
    game.set_unkillable(args.unkillable);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut held = PlayerInput::default();

    let (mut rooms_entered, mut clears, mut deaths) = (0_u32, 0_u32, 0_u32);
    for tick in 0..args.ticks {
        let input = random_input(&mut rng, &mut held);
        game.tick(&input);
        for event in game.drain_events() {
            match event {
                GameEvent::RoomEntered { .. } => rooms_entered += 1,
                GameEvent::RoomCleared { .. } => clears += 1,
                GameEvent::PlayerDied => deaths += 1,
                GameEvent::FinalBossDefeated => println!("Final boss defeated at tick {tick}"),
                _ => {}
            }
        }
        check_invariants(&game).map_err(|err| err.context(format!("tick {tick}")))?;
    }

    println!(
        "Fuzzing completed: {rooms_entered} rooms entered, {clears} cleared, {deaths} deaths, floor {}.",
        game.rooms().floor()
    );
    Ok(())
}
