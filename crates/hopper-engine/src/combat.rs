use serde::{Deserialize, Serialize};

use hopper_core::geometry::{BoxExtent, Vec3, boxes_overlap, bottom, top};

use crate::config::{EnemyConfig, HopperConfig};
use crate::player::PlayerState;

/// How a player-enemy overlap resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Contact {
    None,
    /// Player landed on top while falling fast enough.
    Stomp,
    /// Any other overlap. `direction` is -1 or 1, away from the enemy.
    Hit { direction: f32 },
}

/// Classify the overlap between a player and one enemy.
pub fn classify_contact(
    player_pos: Vec3,
    player_size: BoxExtent,
    player_vel: Vec3,
    enemy_pos: Vec3,
    enemy_size: BoxExtent,
    config: &EnemyConfig,
) -> Contact {
    if !boxes_overlap(player_pos, player_size, enemy_pos, enemy_size) {
        return Contact::None;
    }

    let gap = bottom(player_pos, player_size) - top(enemy_pos, enemy_size);
    let falling_fast = player_vel.y < config.stomp_velocity_threshold;
    if falling_fast && gap > config.stomp_gap_min && gap < config.stomp_gap_max {
        return Contact::Stomp;
    }

    let direction = if player_pos.x < enemy_pos.x { -1.0 } else { 1.0 };
    Contact::Hit { direction }
}

/// Bounce the player off a defeated enemy.
pub fn apply_stomp(player: &mut PlayerState, config: &EnemyConfig) {
    player.velocity.y = config.stomp_bounce;
}

/// Damage and knock back the player. Returns false when invincibility or
/// death absorbed the hit, in which case the player is untouched.
///
/// A landed hit cancels any dash, and an upward knockback leaves the ground.
pub fn apply_hit(player: &mut PlayerState, direction: f32, config: &HopperConfig) -> bool {
    if !player.take_damage(config.enemy.contact_damage, config.player.invincibility_duration) {
        return false;
    }
    player.end_dash();
    player.velocity.x = direction * config.enemy.knockback_force;
    player.velocity.y = config.enemy.knockback_up_force;
    if player.velocity.y > 0.0 {
        player.grounded = false;
    }
    true
}
