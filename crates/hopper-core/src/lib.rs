pub mod controls;
pub mod geometry;
pub mod level;
pub mod phase;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::controls::ControlSignals;
    use crate::geometry::{BoxExtent, Vec3};
    use crate::level::{EnemySpawn, Facing, LevelContent, PatrolBounds, Platform, StaticLevel};

    /// Platform depth used by every fixture; matches the built-in levels.
    pub const FIXTURE_DEPTH: f32 = 2.0;

    /// A platform centered at (x, y) with the given width and height.
    pub fn platform(x: f32, y: f32, width: f32, height: f32) -> Platform {
        Platform::new(
            Vec3::new(x, y, 0.0),
            BoxExtent::new(width, height, FIXTURE_DEPTH),
            "#888888",
        )
    }

    /// A wide, one-unit-thick floor whose top surface sits at `top_y`.
    pub fn floor(top_y: f32) -> Platform {
        platform(0.0, top_y - 0.5, 40.0, 1.0)
    }

    /// A tall wall whose inner faces are reachable from a floor at y=0.
    pub fn wall(x: f32, height: f32) -> Platform {
        platform(x, height / 2.0, 1.0, height)
    }

    /// Enemy spawn with the standard 0.8 cube size.
    pub fn enemy_spawn(
        id: &str,
        x: f32,
        y: f32,
        left: f32,
        right: f32,
        facing: Facing,
    ) -> EnemySpawn {
        EnemySpawn {
            id: id.to_string(),
            position: Vec3::new(x, y, 0.0),
            size: BoxExtent::cube(0.8),
            patrol_bounds: PatrolBounds { left, right },
            facing,
        }
    }

    /// Provider that serves the given platforms and enemies for every level.
    pub fn static_level(platforms: Vec<Platform>, enemies: Vec<EnemySpawn>) -> StaticLevel {
        StaticLevel(LevelContent { platforms, enemies })
    }

    pub fn hold_left() -> ControlSignals {
        ControlSignals {
            left: true,
            ..Default::default()
        }
    }

    pub fn hold_right() -> ControlSignals {
        ControlSignals {
            right: true,
            ..Default::default()
        }
    }

    /// Jump pressed this tick and held.
    pub fn press_jump() -> ControlSignals {
        ControlSignals {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        }
    }

    /// Jump still held from an earlier press.
    pub fn hold_jump() -> ControlSignals {
        ControlSignals {
            jump_held: true,
            ..Default::default()
        }
    }

    pub fn press_dash() -> ControlSignals {
        ControlSignals {
            dash_pressed: true,
            ..Default::default()
        }
    }

    pub fn press_restart() -> ControlSignals {
        ControlSignals {
            restart_pressed: true,
            ..Default::default()
        }
    }

    /// Combine two snapshots by OR-ing every field.
    pub fn with(a: ControlSignals, b: ControlSignals) -> ControlSignals {
        ControlSignals {
            left: a.left || b.left,
            right: a.right || b.right,
            jump_held: a.jump_held || b.jump_held,
            jump_pressed: a.jump_pressed || b.jump_pressed,
            dash_pressed: a.dash_pressed || b.dash_pressed,
            restart_pressed: a.restart_pressed || b.restart_pressed,
        }
    }

    /// Assert two floats agree within `eps`, naming the quantity on failure.
    pub fn assert_close(actual: f32, expected: f32, eps: f32, what: &str) {
        assert!(
            (actual - expected).abs() <= eps,
            "{what}: expected {expected}, got {actual} (eps {eps})"
        );
    }
}
