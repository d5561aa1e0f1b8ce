use super::*;
use crate::enemy::BehaviorState;
use crate::player::PLAYER_MAX_HP;
use crate::types::{Direction, Point};

fn new_game(seed: u64) -> Game {
    Game::new(seed, GameConfig::default()).expect("default config builds a run")
}

fn idle(game: &mut Game, ticks: usize) -> Vec<GameEvent> {
    for _ in 0..ticks {
        game.tick(&PlayerInput::default());
    }
    game.drain_events()
}

#[test]
fn run_starts_in_an_empty_spawn_room() {
    let mut game = new_game(1);
    assert_eq!(game.rooms().current_room_type(), Some(RoomType::SpawnRoom));
    assert_eq!(game.enemies().live_count(), 0);
    assert!(!game.rooms().cooldown().enemy_lock);
    let events = game.drain_events();
    assert!(matches!(
        events.as_slice(),
        [GameEvent::RoomEntered { room_type: RoomType::SpawnRoom, .. }]
    ));
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let script = |tick: usize| PlayerInput {
        move_x: if tick % 90 < 45 { 1.0 } else { -1.0 },
        move_y: if tick % 60 < 30 { -1.0 } else { 1.0 },
        aim: Point::new(375.0, 0.0),
        shoot: tick % 20 == 0,
        reload: tick % 150 == 0,
        dodge: tick % 100 == 0,
    };
    let mut a = new_game(42);
    let mut b = new_game(42);
    for tick in 0..600 {
        a.tick(&script(tick));
        b.tick(&script(tick));
        assert_eq!(a.snapshot_hash(), b.snapshot_hash(), "diverged at tick {tick}");
    }
    assert_eq!(a.drain_events(), b.drain_events());
    assert_ne!(new_game(42).snapshot_hash(), new_game(43).snapshot_hash());
}

#[test]
fn walking_through_the_spawn_door_enters_and_locks_the_host() {
    let mut game = new_game(5);
    game.drain_events();
    let start = game.rooms().current_room().expect("spawn loaded");
    let (direction, host) = game
        .rooms()
        .graph()
        .room(start)
        .and_then(|room| room.connections().next())
        .expect("spawn room hangs off a host");
    let (move_x, move_y) = match direction {
        Direction::North => (0.0, -1.0),
        Direction::South => (0.0, 1.0),
        Direction::East => (1.0, 0.0),
        Direction::West => (-1.0, 0.0),
    };
    let walk = PlayerInput { move_x, move_y, ..PlayerInput::default() };

    let mut events = Vec::new();
    for _ in 0..200 {
        game.tick(&walk);
        events.extend(game.drain_events());
        if game.rooms().current_room() == Some(host) {
            break;
        }
    }

    assert_eq!(game.rooms().current_room(), Some(host));
    assert!(events.iter().any(|event| matches!(event, GameEvent::RoomEntered { room, .. } if *room == host)));
    assert!(events.iter().any(|event| matches!(event, GameEvent::EnemiesSpawned { room, .. } if *room == host)));
    assert!(game.rooms().cooldown().enemy_lock);
    assert!(game.enemies().living_in(host) > 0);
}

#[test]
fn shotgun_blast_splits_the_first_floor_boss() {
    let mut game = new_game(9);
    game.teleport_to_room(RoomType::BossRoom).expect("floor has a boss room");
    let boss = game.enemies().enemies().next().expect("boss spawned").pos;
    let offset = if boss.y > 375.0 { -60.0 } else { 60.0 };
    game.player.set_position(Point::new(boss.x, boss.y + offset));
    game.drain_events();

    let fire = PlayerInput { aim: boss, shoot: true, ..PlayerInput::default() };
    game.tick(&fire);
    let events = idle(&mut game, 30);

    assert!(
        events.iter().any(|event| matches!(event, GameEvent::EnemySplit { .. })),
        "events: {events:?}"
    );
}

#[test]
fn clearing_the_final_boss_room_ends_the_run() {
    let mut game = new_game(3);
    let last = game.config().max_floors;
    game.teleport_to_floor(last).expect("last floor builds");
    let boss_room = game.teleport_to_room(RoomType::BossRoom).expect("boss room");
    game.drain_events();

    assert_eq!(game.kill_room_enemies(), 1);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::RoomCleared { room: boss_room }));
    assert!(events.contains(&GameEvent::FinalBossDefeated));
    assert!(!game.rooms().cooldown().enemy_lock);
}

#[test]
fn earlier_boss_rooms_open_a_hatch_instead() {
    let mut game = new_game(4);
    let boss_room = game.teleport_to_room(RoomType::BossRoom).expect("boss room");
    game.kill_room_enemies();
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::RoomCleared { room: boss_room }));
    assert!(!events.contains(&GameEvent::FinalBossDefeated));

    let events = idle(&mut game, 80);
    assert!(events.contains(&GameEvent::FloorAdvanced { floor: 2 }), "events: {events:?}");
    assert_eq!(game.rooms().floor(), 2);
    assert_eq!(game.rooms().current_room_type(), Some(RoomType::SpawnRoom));
    assert!(!game.enemies().is_cleared(boss_room));
}

#[test]
fn death_sends_enemies_wandering_then_respawns_on_floor_one() {
    let mut game = new_game(8);
    game.teleport_to_floor(2).expect("floor two builds");
    game.teleport_to_room(RoomType::BossRoom).expect("boss room");
    game.drain_events();

    game.player.take_damage(10);
    game.tick(&PlayerInput::default());
    assert!(game.drain_events().contains(&GameEvent::PlayerDied));
    assert!(game.is_respawning());
    assert!(
        game.enemies()
            .enemies()
            .all(|enemy| matches!(enemy.state, BehaviorState::Wandering { .. }))
    );

    let events = idle(&mut game, 130);
    assert!(events.contains(&GameEvent::PlayerRespawned));
    assert!(!events.contains(&GameEvent::PlayerDied));
    assert_eq!(game.rooms().floor(), STARTING_FLOOR);
    assert_eq!(game.rooms().current_room_type(), Some(RoomType::SpawnRoom));
    assert_eq!(game.player().hp(), PLAYER_MAX_HP);
    assert_eq!(game.enemies().live_count(), 0);
}

#[test]
fn zero_respawn_delay_respawns_on_the_death_tick() {
    let config = GameConfig { respawn_delay_ms: 0, ..GameConfig::default() };
    let mut game = Game::new(8, config).expect("zero delay is a valid config");
    game.drain_events();

    game.player.take_damage(10);
    let events = idle(&mut game, 50);
    let died = events.iter().filter(|event| **event == GameEvent::PlayerDied).count();
    let respawned = events.iter().filter(|event| **event == GameEvent::PlayerRespawned).count();
    assert_eq!((died, respawned), (1, 1));
    assert!(!game.player().is_dead());
    assert!(!game.is_respawning());
}

#[test]
fn unkillable_player_survives_contact() {
    let mut game = new_game(12);
    game.set_unkillable(true);
    game.teleport_to_room(RoomType::BossRoom).expect("boss room");
    let boss = game.enemies().enemies().next().expect("boss").pos;
    game.player.set_position(boss);
    idle(&mut game, 60);
    assert_eq!(game.player().hp(), PLAYER_MAX_HP);
    assert!(!game.player().is_dead());
}
