//! Enemy registry: per-kind stats and the per-floor spawn tables that price them.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EnemyKind {
    Slime,
    SplittingSlime,
    KingSlime,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    pub hp: i32,
    /// Pixels per tick at speed tier zero.
    pub base_speed: f32,
    pub damage: i32,
    /// Side of the square hitbox at scale 1.
    pub size: f32,
    pub scale: f32,
    pub splits: bool,
}

pub fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Slime => EnemyStats {
            hp: 4,
            base_speed: 2.0,
            damage: 1,
            size: 30.0,
            scale: 1.0,
            splits: false,
        },
        EnemyKind::SplittingSlime => EnemyStats {
            hp: 4,
            base_speed: 1.6,
            damage: 1,
            size: 36.0,
            scale: 1.0,
            splits: true,
        },
        EnemyKind::KingSlime => EnemyStats {
            hp: 24,
            base_speed: 1.2,
            damage: 1,
            size: 40.0,
            scale: 2.0,
            splits: true,
        },
    }
}

/// Extra speed per tier, as a fraction of base speed.
pub const SPEED_PER_TIER: f32 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    pub cost: u32,
    pub weight: u32,
}

const FLOOR_ONE_TABLE: &[SpawnEntry] = &[
    SpawnEntry { kind: EnemyKind::Slime, cost: 4, weight: 1 },
    SpawnEntry { kind: EnemyKind::Slime, cost: 3, weight: 1 },
];
const FLOOR_TWO_TABLE: &[SpawnEntry] = &[
    SpawnEntry { kind: EnemyKind::Slime, cost: 3, weight: 2 },
    SpawnEntry { kind: EnemyKind::SplittingSlime, cost: 5, weight: 1 },
];
const FLOOR_THREE_TABLE: &[SpawnEntry] = &[
    SpawnEntry { kind: EnemyKind::Slime, cost: 2, weight: 2 },
    SpawnEntry { kind: EnemyKind::SplittingSlime, cost: 4, weight: 2 },
];
const FLOOR_FOUR_TABLE: &[SpawnEntry] = &[
    SpawnEntry { kind: EnemyKind::Slime, cost: 2, weight: 1 },
    SpawnEntry { kind: EnemyKind::SplittingSlime, cost: 3, weight: 3 },
];
const SPAWN_TABLES: [&[SpawnEntry]; 4] =
    [FLOOR_ONE_TABLE, FLOOR_TWO_TABLE, FLOOR_THREE_TABLE, FLOOR_FOUR_TABLE];

const EARLY_BOSSES: &[EnemyKind] = &[EnemyKind::SplittingSlime];
const LATE_BOSSES: &[EnemyKind] = &[EnemyKind::KingSlime, EnemyKind::SplittingSlime];

/// Spawn table for a floor; floors past the end reuse the last table.
pub fn spawn_table(floor: u8) -> &'static [SpawnEntry] {
    SPAWN_TABLES[table_slot(floor, SPAWN_TABLES.len())]
}

pub fn boss_table(floor: u8) -> &'static [EnemyKind] {
    if floor <= 1 { EARLY_BOSSES } else { LATE_BOSSES }
}

fn table_slot(floor: u8, len: usize) -> usize {
    usize::from(floor.saturating_sub(1)).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_floor_has_spawnable_entries() {
        for floor in 0..10 {
            assert!(!spawn_table(floor).is_empty());
            assert!(spawn_table(floor).iter().all(|entry| entry.cost > 0 && entry.weight > 0));
            assert!(!boss_table(floor).is_empty());
        }
    }

    #[test]
    fn tables_clamp_to_last_floor() {
        assert_eq!(spawn_table(4), spawn_table(40));
        assert_eq!(spawn_table(0), spawn_table(1));
    }
}
