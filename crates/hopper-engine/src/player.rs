use serde::{Deserialize, Serialize};

use hopper_core::geometry::{BoxExtent, Vec3};
use hopper_core::timer::Countdown;

use crate::collision::Contacts;
use crate::config::HopperConfig;

/// Authoritative state of the player-controlled actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: BoxExtent,
    pub grounded: bool,
    pub walled_left: bool,
    pub walled_right: bool,
    pub health: i32,
    pub max_health: i32,
    /// Invincible while active.
    pub invincibility: Countdown,
    pub jumps_remaining: u8,
    pub max_jumps: u8,
    pub dash_cooldown: Countdown,
    pub dashing: bool,
    /// -1, 0 or 1. Zero whenever no dash is in progress.
    pub dash_direction: i8,
}

impl PlayerState {
    /// Fresh player at the configured spawn point.
    pub fn spawn(config: &HopperConfig) -> Self {
        Self {
            position: config.player.spawn,
            velocity: Vec3::ZERO,
            size: config.player.size,
            grounded: false,
            walled_left: false,
            walled_right: false,
            health: config.player.max_health,
            max_health: config.player.max_health,
            invincibility: Countdown::idle(),
            jumps_remaining: config.movement.max_jumps,
            max_jumps: config.movement.max_jumps,
            dash_cooldown: Countdown::idle(),
            dashing: false,
            dash_direction: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_walled(&self) -> bool {
        self.walled_left || self.walled_right
    }

    /// Spend one jump charge. Returns false, leaving the count untouched,
    /// when none remain.
    pub fn consume_jump(&mut self) -> bool {
        if self.jumps_remaining > 0 {
            self.jumps_remaining -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset_jumps(&mut self) {
        self.jumps_remaining = self.max_jumps;
    }

    pub fn has_all_jumps(&self) -> bool {
        self.jumps_remaining == self.max_jumps
    }

    /// Apply `amount` damage and start invincibility.
    ///
    /// Returns false without changing anything when the player is invincible
    /// or already dead. Health never drops below zero.
    pub fn take_damage(&mut self, amount: i32, invincibility: f32) -> bool {
        if self.is_invincible() || !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount.max(0)).clamp(0, self.max_health);
        self.invincibility.arm(invincibility);
        true
    }

    pub fn tick_invincibility(&mut self, dt: f32) {
        self.invincibility.tick(dt);
    }

    pub fn apply_contacts(&mut self, contacts: Contacts) {
        self.grounded = contacts.grounded;
        self.walled_left = contacts.walled_left;
        self.walled_right = contacts.walled_right;
    }

    pub fn end_dash(&mut self) {
        self.dashing = false;
        self.dash_direction = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> PlayerState {
        PlayerState::spawn(&HopperConfig::default())
    }

    #[test]
    fn spawn_matches_initial_state() {
        let p = fresh();
        assert_eq!(p.position, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.health, 3);
        assert_eq!(p.max_health, 3);
        assert_eq!(p.jumps_remaining, 2);
        assert!(!p.grounded);
        assert!(!p.is_invincible());
        assert!(!p.dashing);
        assert_eq!(p.dash_direction, 0);
    }

    #[test]
    fn jump_consumption_stops_at_zero() {
        let mut p = fresh();
        assert!(p.consume_jump());
        assert!(p.consume_jump());
        assert!(!p.consume_jump(), "No charge left");
        assert_eq!(p.jumps_remaining, 0);
        p.reset_jumps();
        assert!(p.has_all_jumps());
    }

    #[test]
    fn damage_arms_invincibility_and_gates_repeat() {
        let mut p = fresh();
        assert!(p.take_damage(1, 1.5));
        assert_eq!(p.health, 2);
        assert!(p.is_invincible());

        assert!(!p.take_damage(1, 1.5), "Invincible players take no damage");
        assert_eq!(p.health, 2);

        p.tick_invincibility(1.5);
        assert!(!p.is_invincible());
        assert!(p.take_damage(1, 1.5));
        assert_eq!(p.health, 1);
    }

    #[test]
    fn health_clamps_at_zero_and_dead_players_ignore_damage() {
        let mut p = fresh();
        assert!(p.take_damage(10, 0.0));
        assert_eq!(p.health, 0);
        assert!(!p.is_alive());
        assert!(!p.take_damage(1, 0.0));
        assert_eq!(p.health, 0);
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut p = fresh();
        p.take_damage(-5, 0.0);
        assert_eq!(p.health, 3);
    }
}
