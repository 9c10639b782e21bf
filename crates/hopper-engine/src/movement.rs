use serde::{Deserialize, Serialize};

use hopper_core::controls::ControlSignals;
use hopper_core::level::Platform;
use hopper_core::timer::Countdown;

use crate::collision;
use crate::config::HopperConfig;
use crate::player::PlayerState;

/// Which branch of the jump priority chain fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    Ground,
    /// Ground-strength jump taken shortly after walking off a ledge.
    Coyote,
    Air,
    Wall,
}

/// Variable-height window opened by every jump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpHold {
    pub elapsed: f32,
    pub open: bool,
    /// Jump was let go while the window was open; ascent now decays.
    pub released: bool,
}

impl JumpHold {
    pub(crate) fn start(&mut self) {
        *self = Self {
            elapsed: 0.0,
            open: true,
            released: false,
        };
    }

    pub(crate) fn close(&mut self) {
        *self = Self::default();
    }
}

/// Timers carried across ticks by the movement state machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementTimers {
    pub coyote: Countdown,
    pub jump_buffer: Countdown,
    pub dash_active: Countdown,
    pub jump_hold: JumpHold,
    /// Grounded state at the start of the previous tick.
    pub was_grounded: bool,
}

/// What happened to the player during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementReport {
    pub jump: Option<JumpKind>,
    pub dashed: bool,
    pub landed: bool,
}

/// Advance the player by one tick.
///
/// Phases run in a fixed order and each one reads what the previous wrote:
/// timers, jump buffering, dash, horizontal control, jump resolution,
/// variable jump height, gravity, integration, collision, landing, safety floor.
/// `dt` must be positive and finite; the caller filters degenerate ticks.
pub fn tick_player(
    player: &mut PlayerState,
    timers: &mut MovementTimers,
    input: &ControlSignals,
    platforms: &[Platform],
    config: &HopperConfig,
    dt: f32,
) -> MovementReport {
    let physics = &config.physics;
    let movement = &config.movement;
    let mut report = MovementReport::default();
    let grounded_at_start = player.grounded;

    // 1. Timers
    if timers.was_grounded && !grounded_at_start {
        timers.coyote.arm(movement.coyote_time);
    } else if grounded_at_start {
        timers.coyote.clear();
    } else {
        timers.coyote.tick(dt);
    }
    timers.jump_buffer.tick(dt);
    player.dash_cooldown.tick(dt);
    if player.dashing {
        timers.dash_active.tick(dt);
        if timers.dash_active.is_expired() {
            player.end_dash();
        }
    }

    // 2. Jump buffering
    if input.jump_pressed {
        timers.jump_buffer.arm(movement.jump_buffer_time);
    }

    // 3. Dash
    if input.dash_pressed && player.dash_cooldown.is_expired() && !player.dashing {
        let direction = match input.horizontal() {
            0 if player.velocity.x < 0.0 => -1,
            0 => 1,
            held => held,
        };
        player.dashing = true;
        player.dash_direction = direction;
        timers.dash_active.arm(movement.dash_duration);
        player.dash_cooldown.arm(movement.dash_cooldown);
        player.velocity.x = f32::from(direction) * movement.dash_speed;
        player.velocity.y = 0.0;
        report.dashed = true;
    }

    // 4. Horizontal control
    if !player.dashing {
        let accel = physics.move_speed * dt * physics.acceleration_factor;
        player.velocity.x = match input.horizontal() {
            -1 => (player.velocity.x - accel).max(-physics.max_move_speed),
            1 => (player.velocity.x + accel).min(physics.max_move_speed),
            _ => player.velocity.x * physics.friction,
        };
    }

    // 5. Jump resolution
    report.jump = resolve_jump(player, timers, config);
    if report.jump.is_some() {
        timers.jump_hold.start();
        if player.dashing {
            player.end_dash();
            timers.dash_active.clear();
        }
    }

    // 6. Variable jump height
    let hold = &mut timers.jump_hold;
    if hold.open {
        if player.velocity.y <= 0.0 {
            hold.close();
        } else if input.jump_held && !hold.released {
            hold.elapsed += dt;
            if hold.elapsed >= movement.jump_hold_time {
                hold.close();
            }
        } else {
            hold.released = true;
            player.velocity.y *= (-movement.jump_force_decay_rate * dt).exp();
        }
    }

    // 7. Gravity and fall-speed clamp
    if !player.dashing {
        player.velocity.y += physics.gravity * dt;
        let floor = if player.is_walled() && !player.grounded && player.velocity.y < 0.0 {
            movement.wall_slide_speed
        } else {
            physics.max_fall_speed
        };
        player.velocity.y = player.velocity.y.max(floor);
    }

    // 8. Integrate
    player.position.x += player.velocity.x * dt;
    player.position.y += player.velocity.y * dt;

    // 9. Collision
    let result = collision::resolve(
        player.position,
        player.size,
        player.velocity,
        platforms,
        config.world.contact_skin,
    );
    player.position = result.position;
    player.velocity = result.velocity;
    player.apply_contacts(result.contacts);

    // 10. Landing
    if player.grounded && !grounded_at_start {
        land(player, timers, &mut report);
    }

    // 11. Safety floor
    if player.position.y <= config.world.safety_floor_y {
        player.position.y = config.world.safety_floor_y;
        player.velocity.y = 0.0;
        player.grounded = true;
        if !grounded_at_start && !report.landed {
            land(player, timers, &mut report);
        }
    }

    timers.was_grounded = grounded_at_start && report.jump.is_none();
    report
}

fn land(player: &mut PlayerState, timers: &mut MovementTimers, report: &mut MovementReport) {
    player.reset_jumps();
    timers.jump_hold.close();
    report.landed = true;
}

/// Priority chain: wall jump, then ground or coyote jump, then air jump.
/// At most one branch fires.
fn resolve_jump(
    player: &mut PlayerState,
    timers: &mut MovementTimers,
    config: &HopperConfig,
) -> Option<JumpKind> {
    if timers.jump_buffer.is_expired() {
        return None;
    }
    let movement = &config.movement;
    let airborne = !player.grounded;

    if airborne && player.is_walled() {
        let away = if player.walled_left { 1.0 } else { -1.0 };
        player.velocity.x = away * movement.wall_jump_force_x;
        player.velocity.y = movement.wall_jump_force_y;
        player.reset_jumps();
        player.consume_jump();
        timers.jump_buffer.clear();
        timers.coyote.clear();
        return Some(JumpKind::Wall);
    }

    let coyote_ready = timers.coyote.is_active() && player.has_all_jumps();
    if (player.grounded || coyote_ready) && player.consume_jump() {
        let kind = if player.grounded {
            JumpKind::Ground
        } else {
            JumpKind::Coyote
        };
        player.velocity.y = config.physics.jump_force;
        player.grounded = false;
        timers.coyote.clear();
        timers.jump_buffer.clear();
        return Some(kind);
    }

    if airborne && player.consume_jump() {
        player.velocity.y = movement.double_jump_force;
        timers.jump_buffer.clear();
        return Some(JumpKind::Air);
    }

    None
}
