//! Hand-authored layouts served by [`BuiltinLevels`].
//!
//! Level 1 is a tutorial course: ground, a wall-jump shaft, dash gaps, a
//! coyote-time ledge and an ascending spiral. Level 2 and above keep every
//! level-1 piece and add a higher tier.

use hopper_core::geometry::{BoxExtent, Vec3};
use hopper_core::level::{EnemySpawn, Facing, LevelContent, LevelProvider, PatrolBounds, Platform};

const DEPTH: f32 = 2.0;
const ENEMY_EDGE: f32 = 0.8;

/// (x, y, width, height, color)
type PlatformRow = (f32, f32, f32, f32, &'static str);
/// (id, x, y, patrol left, patrol right, facing)
type EnemyRow = (&'static str, f32, f32, f32, f32, Facing);

const GROUND: PlatformRow = (0.0, -5.0, 20.0, 1.0, "#8B4513");

const LEVEL_ONE_PLATFORMS: &[PlatformRow] = &[
    // Starting area
    (-6.0, -3.0, 3.0, 1.0, "#4ECDC4"),
    (2.0, -1.0, 4.0, 1.0, "#45B7D1"),
    (-3.0, 1.0, 2.0, 1.0, "#96CEB4"),
    (7.0, 2.0, 3.0, 1.0, "#FFEAA7"),
    // Wall-jump shaft
    (-9.5, 0.0, 1.0, 6.0, "#FF6B9D"),
    (-7.5, 0.0, 1.0, 6.0, "#C44569"),
    (-8.5, 5.5, 2.5, 1.0, "#F8B500"),
    // Dash gap
    (12.0, 0.0, 2.0, 1.0, "#A8E6CF"),
    (18.0, 0.0, 2.5, 1.0, "#FFD3B6"),
    // Double-jump steps
    (-1.0, 4.0, 2.0, 1.0, "#FFAAA5"),
    (3.0, 6.0, 2.0, 1.0, "#FF8B94"),
    (-4.0, 8.0, 3.0, 1.0, "#FFD700"),
    // Right wall-jump tower
    (13.5, 3.0, 1.0, 8.0, "#6C5CE7"),
    (16.5, 3.0, 1.0, 8.0, "#A29BFE"),
    (15.0, 10.0, 2.0, 1.0, "#FD79A8"),
    // Narrow precision ledges
    (8.0, 5.0, 1.5, 1.0, "#74B9FF"),
    (5.0, 8.0, 1.5, 1.0, "#A29BFE"),
    // Lower dash section
    (-12.0, -2.0, 2.0, 1.0, "#55EFC4"),
    (-17.0, -2.0, 2.5, 1.0, "#00B894"),
    // Coyote ledge
    (10.0, -3.0, 4.0, 1.0, "#81ECEC"),
    // Center spiral
    (0.0, 3.0, 2.0, 1.0, "#FAB1A0"),
    (-2.0, 5.5, 2.0, 1.0, "#FF7675"),
    (1.0, 9.0, 2.5, 1.0, "#FD79A8"),
];

const LEVEL_TWO_PLATFORMS: &[PlatformRow] = &[
    (-8.0, 12.0, 2.0, 1.0, "#DDA0DD"),
    (0.0, 13.0, 3.0, 1.0, "#F39C12"),
    (9.0, 15.0, 2.0, 1.0, "#E74C3C"),
    (20.0, 5.0, 2.0, 1.0, "#E17055"),
    (25.0, 8.0, 2.0, 1.0, "#D63031"),
    // Triple wall-jump shaft
    (-15.0, 8.0, 1.0, 10.0, "#6C5CE7"),
    (-12.0, 8.0, 1.0, 10.0, "#A29BFE"),
    (-13.5, 17.0, 2.0, 1.0, "#FFEAA7"),
];

const LEVEL_ONE_ENEMIES: &[EnemyRow] = &[
    ("enemy-1-1", 2.0, 0.0, 0.5, 5.5, Facing::Right),
    ("enemy-1-2", -6.0, -2.0, -7.5, -4.5, Facing::Left),
    ("enemy-1-3", 12.0, 1.0, 11.0, 13.0, Facing::Right),
    ("enemy-1-4", -8.5, 6.5, -9.5, -7.5, Facing::Left),
    ("enemy-1-5", 10.0, -2.0, 8.0, 12.0, Facing::Right),
    ("enemy-1-6", 0.0, 4.0, -1.0, 1.0, Facing::Left),
];

const LEVEL_TWO_ENEMIES: &[EnemyRow] = &[
    ("enemy-2-1", 0.0, 14.0, -1.5, 1.5, Facing::Right),
    ("enemy-2-2", 20.0, 6.0, 19.0, 21.0, Facing::Left),
    ("enemy-2-3", -13.5, 18.0, -14.5, -12.5, Facing::Right),
    ("enemy-2-4", 15.0, 11.0, 14.0, 16.0, Facing::Left),
];

fn build_platform(&(x, y, width, height, color): &PlatformRow) -> Platform {
    Platform::new(Vec3::new(x, y, 0.0), BoxExtent::new(width, height, DEPTH), color)
}

fn build_enemy(&(id, x, y, left, right, facing): &EnemyRow) -> EnemySpawn {
    EnemySpawn {
        id: id.to_string(),
        position: Vec3::new(x, y, 0.0),
        size: BoxExtent::cube(ENEMY_EDGE),
        patrol_bounds: PatrolBounds { left, right },
        facing,
    }
}

/// The two hand-authored courses. Levels beyond 2 reuse the level-2 layout;
/// level 0 is treated as level 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl LevelProvider for BuiltinLevels {
    fn content(&self, level: u32) -> LevelContent {
        let tiers: &[(&[PlatformRow], &[EnemyRow])] = if level >= 2 {
            &[
                (LEVEL_ONE_PLATFORMS, LEVEL_ONE_ENEMIES),
                (LEVEL_TWO_PLATFORMS, LEVEL_TWO_ENEMIES),
            ]
        } else {
            &[(LEVEL_ONE_PLATFORMS, LEVEL_ONE_ENEMIES)]
        };

        let mut content = LevelContent {
            platforms: vec![build_platform(&GROUND)],
            enemies: Vec::new(),
        };
        for (platforms, enemies) in tiers {
            content.platforms.extend(platforms.iter().map(build_platform));
            content.enemies.extend(enemies.iter().map(build_enemy));
        }
        content
    }
}
