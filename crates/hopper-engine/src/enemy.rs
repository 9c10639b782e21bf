use serde::{Deserialize, Serialize};

use hopper_core::geometry::{BoxExtent, Vec3, bottom, horizontal_span, top};
use hopper_core::level::{EnemySpawn, Facing, PatrolBounds, Platform};

use crate::collision;
use crate::config::{EnemyConfig, HopperConfig};

/// Runtime state of one patrolling enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    pub id: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: BoxExtent,
    pub patrol_bounds: PatrolBounds,
    pub facing: Facing,
    pub grounded: bool,
    pub alive: bool,
}

impl EnemyState {
    pub fn from_spawn(spawn: &EnemySpawn) -> Self {
        Self {
            id: spawn.id.clone(),
            position: spawn.position,
            velocity: Vec3::ZERO,
            size: spawn.size,
            patrol_bounds: spawn.patrol_bounds,
            facing: spawn.facing,
            grounded: false,
            alive: true,
        }
    }
}

/// True when no platform top lies under a probe just past the enemy's
/// leading edge, meaning the next steps would walk off a ledge.
pub fn enemy_at_edge(
    position: Vec3,
    size: BoxExtent,
    facing: Facing,
    platforms: &[Platform],
    config: &EnemyConfig,
) -> bool {
    let probe_x = position.x + facing.sign() * (size.width / 2.0 + config.edge_probe_ahead);
    let probe_y = bottom(position, size) - config.edge_probe_below;

    !platforms.iter().any(|p| {
        let surface = top(p.position, p.size);
        let (left, right) = horizontal_span(p.position, p.size);
        probe_y > surface - config.edge_probe_tolerance
            && probe_y < surface + config.edge_probe_tolerance
            && probe_x > left
            && probe_x < right
    })
}

/// Advance one enemy: patrol, gravity, collision, then edge check.
/// Returns true if the enemy turned around this tick.
pub fn tick_enemy(
    enemy: &mut EnemyState,
    platforms: &[Platform],
    config: &HopperConfig,
    dt: f32,
) -> bool {
    if !enemy.alive {
        return false;
    }
    let patrol = config.enemy.patrol_speed;
    let mut turned = false;

    let at_bound = match enemy.facing {
        Facing::Left => enemy.position.x <= enemy.patrol_bounds.left,
        Facing::Right => enemy.position.x >= enemy.patrol_bounds.right,
    };
    if at_bound {
        enemy.facing = enemy.facing.reversed();
        turned = true;
    }
    enemy.velocity.x = enemy.facing.sign() * patrol;

    enemy.velocity.y =
        (enemy.velocity.y + config.physics.gravity * dt).max(config.physics.max_fall_speed);

    enemy.position.x += enemy.velocity.x * dt;
    enemy.position.y += enemy.velocity.y * dt;

    let result = collision::resolve(
        enemy.position,
        enemy.size,
        enemy.velocity,
        platforms,
        config.world.contact_skin,
    );
    enemy.position = result.position;
    enemy.velocity = result.velocity;
    enemy.grounded = result.contacts.grounded;

    if enemy.grounded
        && enemy_at_edge(enemy.position, enemy.size, enemy.facing, platforms, &config.enemy)
    {
        enemy.facing = enemy.facing.reversed();
        enemy.velocity.x = enemy.facing.sign() * patrol;
        turned = true;
    }

    turned
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopper_core::test_helpers::{assert_close, enemy_spawn, floor, platform};

    const DT: f32 = 1.0 / 60.0;

    /// Enemy resting on `floor(0.0)` (0.8 cube, so center at 0.4).
    fn walker(x: f32, left: f32, right: f32, facing: Facing) -> EnemyState {
        let mut enemy = EnemyState::from_spawn(&enemy_spawn("e", x, 0.4, left, right, facing));
        enemy.grounded = true;
        enemy
    }

    #[test]
    fn spawn_starts_alive_and_still() {
        let spawn = enemy_spawn("enemy-1-1", 2.0, 0.0, 0.5, 5.5, Facing::Right);
        let enemy = EnemyState::from_spawn(&spawn);
        assert_eq!(enemy.id, "enemy-1-1");
        assert_eq!(enemy.velocity, Vec3::ZERO);
        assert!(enemy.alive);
        assert!(!enemy.grounded);
    }

    #[test]
    fn patrols_in_facing_direction() {
        let ground = [floor(0.0)];
        let mut enemy = walker(0.0, -5.0, 5.0, Facing::Right);
        let turned = tick_enemy(&mut enemy, &ground, &HopperConfig::default(), DT);
        assert!(!turned);
        assert_eq!(enemy.velocity.x, 3.0);
        assert_close(enemy.position.x, 3.0 * DT, 1e-6, "enemy x");
        assert!(enemy.grounded);
        assert_close(enemy.position.y, 0.4, 1e-6, "enemy rests on floor");
    }

    #[test]
    fn reverses_at_patrol_bound_before_moving() {
        let ground = [floor(0.0)];
        let mut enemy = walker(2.0, -2.0, 2.0, Facing::Right);
        let turned = tick_enemy(&mut enemy, &ground, &HopperConfig::default(), DT);
        assert!(turned);
        assert_eq!(enemy.facing, Facing::Left);
        assert_eq!(enemy.velocity.x, -3.0);
        assert!(enemy.position.x < 2.0, "Must not step past the bound");
    }

    #[test]
    fn reverses_at_ledge() {
        let ledge = [platform(0.0, -0.5, 4.0, 1.0)];
        let mut enemy = walker(1.5, -10.0, 10.0, Facing::Right);
        let turned = tick_enemy(&mut enemy, &ledge, &HopperConfig::default(), DT);
        assert!(turned);
        assert_eq!(enemy.facing, Facing::Left);
        assert_eq!(enemy.velocity.x, -3.0);
    }

    #[test]
    fn keeps_walking_mid_platform() {
        let ledge = [platform(0.0, -0.5, 4.0, 1.0)];
        let mut enemy = walker(0.0, -10.0, 10.0, Facing::Left);
        assert!(!tick_enemy(&mut enemy, &ledge, &HopperConfig::default(), DT));
        assert_eq!(enemy.facing, Facing::Left);
    }

    #[test]
    fn airborne_enemy_falls_without_edge_check() {
        let spawn = enemy_spawn("e", 0.0, 10.0, -5.0, 5.0, Facing::Left);
        let mut enemy = EnemyState::from_spawn(&spawn);
        let turned = tick_enemy(&mut enemy, &[], &HopperConfig::default(), DT);
        assert!(!turned);
        assert!(!enemy.grounded);
        assert!(enemy.velocity.y < 0.0);
        assert_eq!(enemy.facing, Facing::Left);
    }

    #[test]
    fn dead_enemy_is_frozen() {
        let mut enemy = walker(0.0, -5.0, 5.0, Facing::Right);
        enemy.alive = false;
        let before = enemy.clone();
        tick_enemy(&mut enemy, &[floor(0.0)], &HopperConfig::default(), DT);
        assert_eq!(enemy, before);
    }

    #[test]
    fn edge_probe_window() {
        let cfg = EnemyConfig::default();
        let size = BoxExtent::cube(0.8);
        let ledge = [platform(0.0, -0.5, 4.0, 1.0)];
        // Probe lands at x = 1.0 + 0.6 = 1.6, inside the span.
        assert!(!enemy_at_edge(Vec3::new(1.0, 0.4, 0.0), size, Facing::Right, &ledge, &cfg));
        // Probe lands at x = 1.5 + 0.6 = 2.1, past the right edge.
        assert!(enemy_at_edge(Vec3::new(1.5, 0.4, 0.0), size, Facing::Right, &ledge, &cfg));
        // High above the platform the probe misses the vertical window.
        assert!(enemy_at_edge(Vec3::new(0.0, 3.0, 0.0), size, Facing::Right, &ledge, &cfg));
        assert!(enemy_at_edge(Vec3::ZERO, size, Facing::Left, &[], &cfg));
    }
}
